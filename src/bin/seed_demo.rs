#[cfg(feature = "ssr")]
use reptex::{establish_connection, init_schema, seed_demo_data};

#[cfg(feature = "ssr")]
fn main() {
    let mut conn = establish_connection();
    init_schema(&mut conn).expect("Failed to create schema");
    seed_demo_data(&mut conn).expect("Failed to seed demo data");
    println!("Demo challenges and ranking entries loaded.");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    println!("This binary requires the 'ssr' feature to be enabled.");
}
