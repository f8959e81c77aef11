mod app;
mod ui;
mod viewport;

use shared::{parse_assignment, ShapeDescriptor, ShapeKind};

use app::ShapeViewerApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shape_viewer=info,shape_viewer_lib=info".into()),
        )
        .init();

    let initial = parse_args(std::env::args().skip(1));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shape Viewer")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "shape-viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(ShapeViewerApp::new(cc, initial)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// `--scene <file.json>`, `--shape <id>`, `--param key=expr` (repeatable).
/// Bad arguments are logged and skipped.
fn parse_args(mut args: impl Iterator<Item = String>) -> Option<ShapeDescriptor> {
    let mut desc: Option<ShapeDescriptor> = None;
    let mut overrides = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => {
                if let Some(path) = args.next() {
                    desc = load_descriptor(&path).or(desc);
                }
            }
            "--shape" => {
                if let Some(id) = args.next() {
                    desc = Some(match ShapeKind::from_id(&id) {
                        Some(kind) => ShapeDescriptor::with_defaults(kind),
                        None => {
                            tracing::warn!("Unknown shape '{id}'");
                            ShapeDescriptor::new(id, Default::default())
                        }
                    });
                }
            }
            "--param" => {
                if let Some(assignment) = args.next() {
                    match parse_assignment(&assignment) {
                        Ok(kv) => overrides.push(kv),
                        Err(e) => tracing::error!("Bad --param '{assignment}': {e}"),
                    }
                }
            }
            other => tracing::warn!("Ignoring argument '{other}'"),
        }
    }

    if overrides.is_empty() {
        return desc;
    }
    let mut desc = desc.unwrap_or_default();
    for (key, value) in overrides {
        desc.params.set(&key, value);
    }
    Some(desc)
}

fn load_descriptor(path: &str) -> Option<ShapeDescriptor> {
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str::<ShapeDescriptor>(&json) {
            Ok(desc) => {
                tracing::info!("Loaded shape '{}' from {path}", desc.shape);
                Some(desc)
            }
            Err(e) => {
                tracing::error!("Failed to parse shape JSON from {path}: {e}");
                None
            }
        },
        Err(e) => {
            tracing::error!("Failed to read shape file {path}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_shape_with_param_overrides() {
        let desc = parse_args(args(&["--shape", "cylinder", "--param", "h=2*3"])).unwrap();
        assert_eq!(desc.shape, "cylinder");
        assert_eq!(desc.params.get("r"), Some(2.0));
        assert_eq!(desc.params.get("h"), Some(6.0));
    }

    #[test]
    fn test_bad_param_is_skipped() {
        let desc = parse_args(args(&["--shape", "cube", "--param", "a"])).unwrap();
        assert_eq!(desc.params.get("a"), Some(4.0));
    }

    #[test]
    fn test_no_args() {
        assert!(parse_args(args(&[])).is_none());
    }
}
