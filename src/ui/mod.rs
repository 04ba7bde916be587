pub mod icons;
pub mod output;
pub mod progress;
pub mod review;

pub use output::{print_report, print_run_summary, print_status};
pub use progress::StageProgress;
pub use review::EditorReview;
