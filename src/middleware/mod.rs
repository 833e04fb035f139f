pub mod binding;
