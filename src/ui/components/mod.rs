pub mod history_panel;
pub mod setup_form;
pub mod wheel_view;
