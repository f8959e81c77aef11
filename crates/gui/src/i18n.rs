use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use shared::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lang {
    #[default]
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=Ru (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::En,
        _ => Lang::Ru,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language. Unknown keys come back as `"???"`.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.reset_params" => if ru { "Сбросить параметры" } else { "Reset parameters" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.shape_panel" => if ru { "Панель фигуры" } else { "Shape panel" },
        "menu.grid" => if ru { "Сетка" } else { "Grid" },
        "menu.viewport_mounted" => if ru { "Вьюпорт подключён" } else { "Viewport mounted" },
        "menu.reset_camera" => if ru { "Сбросить камеру  Home" } else { "Reset camera  Home" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        "menu.shape" => if ru { "Фигура" } else { "Shape" },
        "menu.solids" => if ru { "Объёмные" } else { "Solids" },
        "menu.planar" => if ru { "Плоские" } else { "Flat" },

        "menu.settings" => if ru { "Настройки" } else { "Settings" },
        "menu.preferences" => if ru { "Параметры приложения..." } else { "Preferences..." },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },
        "settings.grid" => if ru { "Сетка" } else { "Grid" },
        "settings.grid_visible" => if ru { "Показывать сетку" } else { "Show grid" },
        "settings.grid_size" => if ru { "Шаг" } else { "Cell size" },
        "settings.grid_range" => if ru { "Размер (ячеек)" } else { "Range (cells)" },
        "settings.grid_opacity" => if ru { "Прозрачность" } else { "Opacity" },
        "settings.viewport" => if ru { "Вьюпорт" } else { "Viewport" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background" },
        "settings.camera" => if ru { "Камера" } else { "Camera" },
        "settings.fov" => if ru { "Угол обзора" } else { "Field of view" },
        "settings.damping" => if ru { "Инерция" } else { "Damping" },
        "settings.zoom_range" => if ru { "Дистанция мин/макс" } else { "Distance min/max" },
        "settings.labels" => if ru { "Размерные подписи" } else { "Dimension labels" },
        "settings.label_bg" => if ru { "Фон подписи" } else { "Label background" },
        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },
        "settings.apply" => if ru { "Сохранить" } else { "Save" },
        "settings.reset" => if ru { "По умолчанию" } else { "Defaults" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },

        // ── Shape panel ─────────────────────────────────────
        "panel.shape" => if ru { "Фигура" } else { "Shape" },
        "panel.parameters" => if ru { "Параметры" } else { "Parameters" },
        "panel.defaults" => if ru { "По умолчанию" } else { "Defaults" },
        "panel.optional" => if ru { "(необязательный)" } else { "(optional)" },
        "panel.expr_hint" => if ru {
            "Допустимы выражения: 2*PI, math::sqrt(2)"
        } else {
            "Expressions allowed: 2*PI, math::sqrt(2)"
        },
        "panel.expr_error" => if ru { "Ошибка выражения" } else { "Expression error" },

        // ── Status bar ──────────────────────────────────────
        "status.showing" => if ru { "Показано" } else { "Showing" },
        "status.unknown_shape" => if ru { "Неизвестная фигура" } else { "Unknown shape" },
        "status.problems" => if ru { "Проблемы параметров" } else { "Parameter problems" },
        "status.unmounted" => if ru { "Вьюпорт отключён" } else { "Viewport unmounted" },
        "status.frames" => if ru { "кадров" } else { "frames" },
        "status.dimensions" => if ru { "размеров" } else { "dimensions" },

        // ── Viewport ────────────────────────────────────────
        "vp.unmounted_hint" => if ru {
            "Вьюпорт отключён. Вид → Вьюпорт подключён"
        } else {
            "Viewport is unmounted. View → Viewport mounted"
        },
        "vp.no_gl" => if ru { "OpenGL недоступен" } else { "OpenGL is not available" },

        _ => "???",
    }
}

/// Display name of a shape kind
pub fn shape_name(kind: ShapeKind) -> &'static str {
    let ru = lang() == Lang::Ru;
    match kind {
        ShapeKind::Cube => if ru { "Куб" } else { "Cube" },
        ShapeKind::RectangularPrism => if ru { "Прямоугольный параллелепипед" } else { "Rectangular prism" },
        ShapeKind::Sphere => if ru { "Сфера" } else { "Sphere" },
        ShapeKind::Cylinder => if ru { "Цилиндр" } else { "Cylinder" },
        ShapeKind::Cone => if ru { "Конус" } else { "Cone" },
        ShapeKind::Pyramid => if ru { "Пирамида" } else { "Pyramid" },
        ShapeKind::TriangularPrism => if ru { "Треугольная призма" } else { "Triangular prism" },
        ShapeKind::Triangle => if ru { "Треугольник" } else { "Triangle" },
        ShapeKind::Rectangle => if ru { "Прямоугольник" } else { "Rectangle" },
        ShapeKind::Square => if ru { "Квадрат" } else { "Square" },
        ShapeKind::Circle => if ru { "Круг" } else { "Circle" },
        ShapeKind::Trapezoid => if ru { "Трапеция" } else { "Trapezoid" },
        ShapeKind::Rhombus => if ru { "Ромб" } else { "Rhombus" },
        ShapeKind::Rhomboid => if ru { "Параллелограмм" } else { "Rhomboid" },
        ShapeKind::Pentagon => if ru { "Пятиугольник" } else { "Pentagon" },
        ShapeKind::Hexagon => if ru { "Шестиугольник" } else { "Hexagon" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both languages are checked in one test: the language is process-wide.
    #[test]
    fn test_switch_language() {
        set_lang(Lang::En);
        assert_eq!(t("menu.view"), "View");
        assert_eq!(shape_name(ShapeKind::Rhomboid), "Rhomboid");
        set_lang(Lang::Ru);
        assert_eq!(t("menu.view"), "Вид");
        assert_eq!(shape_name(ShapeKind::Cube), "Куб");
        assert_eq!(t("no.such.key"), "???");
    }
}
