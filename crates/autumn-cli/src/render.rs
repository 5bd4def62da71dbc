//! Plain-text rendering of API results for the terminal.

use autumn_client::{Customer, CustomerList, GetOrCreate};

/// One-line summary of a customer: `Customer: <label> (<id>)`.
pub fn customer_summary(customer: &Customer) -> String {
    let id = customer.id.as_deref().unwrap_or("no id");
    format!("Customer: {} ({id})", customer.display_name())
}

/// The two output lines of `get-or-create`: summary, then the record as JSON.
pub fn get_or_create_lines(outcome: &GetOrCreate) -> Result<[String; 2], serde_json::Error> {
    let mut summary = customer_summary(&outcome.customer);
    if outcome.created {
        summary.push_str(" [created]");
    }
    Ok([summary, serde_json::to_string(&outcome.customer)?])
}

/// One line per customer followed by a page footer.
pub fn customer_list_lines(page: &CustomerList) -> Vec<String> {
    let mut lines: Vec<String> = page
        .list
        .iter()
        .map(|c| {
            let id = c.id.as_deref().unwrap_or("-");
            let email = c.email.as_deref().unwrap_or("-");
            format!("{id}\t{}\t{email}", c.display_name())
        })
        .collect();

    let first = if page.list.is_empty() { 0 } else { u64::from(page.offset) + 1 };
    let last = u64::from(page.offset) + page.list.len() as u64;
    let mut footer = format!("{first}-{last} of {} customers", page.total);
    if page.has_more() {
        footer.push_str(&format!(" (next: --offset {last})"));
    }
    lines.push(footer);
    lines
}
