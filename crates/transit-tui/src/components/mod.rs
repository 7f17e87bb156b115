pub mod add_station;
pub mod card_grid;
pub mod help_overlay;
