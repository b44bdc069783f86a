//! Archive core: catalog model, selection state machine and view-model helpers.
//!
//! Everything in this crate is pure. Host input arrives as [`Msg`] values,
//! [`update`] applies them to an [`AppState`] and returns the [`Effect`]s the
//! host must execute.
mod catalog;
mod effect;
mod mode;
mod msg;
mod resolve;
mod selection;
mod state;
mod update;
mod view_model;

pub use catalog::{CatalogIndex, CatalogItem, CatalogParseError, Document};
pub use effect::Effect;
pub use mode::{InputModeController, Mode, ModeQuery};
pub use msg::Msg;
pub use resolve::{Resolution, ResolvedItem, SelectionResolver};
pub use selection::{DocumentRow, SelectionEntry, SelectionSet, SelectionSetManager};
pub use state::{ActionState, AppState, BatchResultKind};
pub use update::update;
pub use view_model::AppViewModel;
