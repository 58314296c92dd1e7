pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod reset;
pub mod show;
pub mod study;
