#[cfg(feature = "ssr")]
use reptex::{establish_connection, reset_database};

#[cfg(feature = "ssr")]
fn main() {
    let mut conn = establish_connection();
    reset_database(&mut conn).expect("Failed to reset database");
    println!("All challenges, ranking entries, and admin sessions cleared.");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    println!("This binary requires the 'ssr' feature to be enabled.");
}
