//! Breadcrumb trail tracking for Cycle views
//!
//! This crate provides:
//! - Breadcrumb entries and the ordered trail (label-unique, prefix-ordered)
//! - The `navigation-changed` publish/subscribe channel
//! - Current route path providers
//! - The tracker that keeps the trail consistent with navigation

pub mod channel;
pub mod path;
pub mod tracker;
pub mod trail;

// Re-exports
pub use channel::{navigation_channel, NavigationEvent, NavigationItem, NavigationPublisher, NavigationSubscription};
pub use path::{PathProvider, SharedPath};
pub use tracker::BreadcrumbTracker;
pub use trail::{BreadcrumbEntry, BreadcrumbTrail, LabelMatchPolicy, TrailChange};
