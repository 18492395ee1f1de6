pub mod rules_file;
