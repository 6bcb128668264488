pub mod use_auth;
pub mod use_calendar;
pub mod use_day_image;
