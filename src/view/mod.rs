//! Test case table view: state, reducer and render surfaces.

pub mod model;
pub mod render;

pub use model::{ViewAction, ViewState, ViewViewModel, compute_view_model, reduce_view_state};
pub use render::{JsonRenderer, Render, TableRenderer};
