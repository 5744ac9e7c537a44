//! Client-side core of the Passionfruit Careers job board.
//!
//! Lists of jobs and applicants are fetched from the REST backend through
//! [`core::EmployerApi`] / [`core::JobSeekerApi`], then shaped for display by
//! the pure transforms in [`pipeline`] and held per screen by
//! [`view::CollectionView`].

pub mod cli;
pub mod core;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod state;
pub mod types;
pub mod utils;
pub mod view;

pub use error::ApiError;
pub use pipeline::{
    compute_stats, filter_entities, group_by_stage, map_stage_to_status, map_status_to_stage,
    sort_entities, CollectionStats, FilterOptions, Listable, SortKey, Stage, StatusFilter,
};
pub use state::AppState;
pub use view::CollectionView;
