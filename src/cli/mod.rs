pub mod detect;
pub mod generate;
pub mod info;

pub use detect::{detect_leak, render_matches};
pub use generate::generate_campaign;
pub use info::show_info;
