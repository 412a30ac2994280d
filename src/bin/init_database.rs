#[cfg(feature = "ssr")]
use reptex::{establish_connection, init_schema};

#[cfg(feature = "ssr")]
fn main() {
    let mut conn = establish_connection();
    init_schema(&mut conn).expect("Failed to create schema");
    println!("Database schema is ready.");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    println!("This binary requires the 'ssr' feature to be enabled.");
}
