//! Client-side state machine and dropdown geometry for the NeuroRecall
//! admin notification bell.
//!
//! The bell polls the backend's unread-count endpoint on a fixed interval,
//! fetches the recent-notification list lazily when the dropdown opens, and
//! applies mark-read actions optimistically. All of that lives in
//! [`controller::BellController`], which runs as a tokio task and publishes
//! immutable [`state::BellState`] snapshots over a watch channel for a view
//! layer to render. [`placement::place_dropdown`] is the pure geometry that
//! pins the floating panel to the trigger without leaving the viewport.
//!
//! Rendering, session management, and the REST backend itself are external
//! collaborators; this crate only talks to them through
//! [`api::NotificationsApi`] and the published snapshots.

pub mod api;
pub mod controller;
pub mod placement;
pub mod state;

mod constants;

pub use api::{ApiError, HttpNotificationsApi, NotificationsApi};
pub use controller::{BellController, BellHandle};
pub use placement::{
    place_dropdown, DeviceClass, DropdownPlacement, HorizontalAnchor, TriggerRect, Viewport,
};
pub use state::{BellState, PanelState};
