pub mod tomlgen;
