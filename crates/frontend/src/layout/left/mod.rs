pub mod sidebar;
pub mod sidebar_state;
