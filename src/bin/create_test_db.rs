use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Duration;

use expense_tracker::{
    Amount, Clock, Description, LocalClock, NewExpense, create_expense, get_all_categories,
    initialize_db,
};

/// A utility for creating a test database for expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of sample expenses to create, counting back from today.
    #[arg(long, short, default_value_t = 6)]
    months: u32,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

/// Sample expenses as (description, amount in cents, index into the default categories).
const SAMPLE_EXPENSES: [(&str, i64, usize); 8] = [
    ("Groceries", 8_745, 0),
    ("Coffee", 550, 0),
    ("Bus fare", 320, 1),
    ("Petrol", 6_120, 1),
    ("New shoes", 12_999, 2),
    ("Power bill", 14_230, 3),
    ("Internet", 7_999, 3),
    ("Birthday gift", 4_500, 4),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let categories = get_all_categories(&conn)?;
    if categories.is_empty() {
        eprintln!("The database has no categories to add expenses to.");
        exit(1);
    }

    let today = LocalClock::new(&args.timezone)?.today()?;
    let days = i64::from(args.months) * 30;

    println!("Creating sample expenses for the last {} months...", args.months);

    let mut expense_count = 0;
    for day in (0..days).step_by(3) {
        let (description, cents, category_index) =
            SAMPLE_EXPENSES[(day as usize / 3) % SAMPLE_EXPENSES.len()];
        let category = &categories[category_index % categories.len()];

        create_expense(
            NewExpense {
                date: today - Duration::days(day),
                description: Description::new(description)?,
                amount: Amount::new(Decimal::new(cents, 2))?,
                category_id: category.id,
            },
            &conn,
        )?;
        expense_count += 1;
    }

    println!("Created {expense_count} expenses.");
    println!("Success!");

    Ok(())
}
