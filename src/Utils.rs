/// loading reaction tasks from JSON files
pub mod load_from_file;
