#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Grid;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Species;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;
