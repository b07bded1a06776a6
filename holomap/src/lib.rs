pub mod handlers;

pub use handlers::{build_report, load_catalog, parse_format, render_people_table, resolve_output_path};
