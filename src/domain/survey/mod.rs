//! Survey domain: field registry, interview state, prompt construction,
//! directive handling, completion transitions and the token ledger.

mod completion;
mod definition;
mod directive;
mod errors;
mod export;
mod ledger;
mod prompt;
mod registry;
mod state;
mod template;
mod texts;
mod tool;

pub use completion::{attach_document, CompletionCheck};
pub use definition::SurveyDefinition;
pub use directive::{
    apply_batch, set_field_tool, BatchReport, DirectiveRejection, FieldDirective, ACK_SUCCESS,
    SET_FIELD_TOOL,
};
pub use errors::SurveyError;
pub use export::{render_csv, USERNAME_COLUMN};
pub use ledger::MIN_TURN_BALANCE;
pub use prompt::PromptBuilder;
pub use registry::{Field, FieldRegistry};
pub use state::{HistoryEntry, InterviewState, Role};
pub use template::{PromptTemplate, DATA_PLACEHOLDER};
pub use texts::{text, TextKey, DEFAULT_LANGUAGE};
pub use tool::{ToolCall, ToolDefinition};
