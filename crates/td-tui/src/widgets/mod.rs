pub mod checkpoint_card;
pub mod debug_overlay;
pub mod modal;
pub mod sidebar;
pub mod status_bar;
