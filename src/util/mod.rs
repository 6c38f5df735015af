pub mod time_value;
