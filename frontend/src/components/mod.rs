pub mod advent_box;
pub mod advent_calendar;
pub mod header;
pub mod image_lightbox;
pub mod login_form;
pub mod reveal_overlay;
