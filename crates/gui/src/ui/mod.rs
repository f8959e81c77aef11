pub mod shape_panel;
pub mod status_bar;
