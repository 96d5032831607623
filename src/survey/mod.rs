pub mod loader;
pub mod query;
pub mod table;

pub use loader::{load_survey, read_survey, LoadError, MODEL_COLUMN};
pub use query::{column_span, column_totals, find_models, Matcher};
pub use table::{Answer, ModelRow, SurveyTable};
