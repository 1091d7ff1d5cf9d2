use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::generate::print_rate_summary;
use crate::cli::{rate_source, resolve_base_dir};
use crate::error::Result;
use crate::fmt::euros;
use crate::models::Order;
use crate::report::status_class;
use crate::settings::load_settings;
use crate::tracker::prepare;

fn status_cell(order: &Order) -> Cell {
    if order.is_archived {
        return Cell::new("Received".green());
    }
    match status_class(&order.status) {
        "status-ready" => Cell::new(order.status.as_str().green()),
        "status-transit" => Cell::new(order.status.as_str().cyan()),
        _ => Cell::new(order.status.as_str()),
    }
}

pub fn format_orders<'a>(orders: impl Iterator<Item = &'a Order>) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Order", "Status", "Delivery", "Date", "Price", "Note"]);
    let mut total = 0.0;
    let mut count = 0usize;
    for order in orders {
        let note = if order.is_delayed {
            order.description.as_str().red().to_string()
        } else {
            order.description.clone()
        };
        table.add_row(vec![
            Cell::new(&order.order_number),
            status_cell(order),
            Cell::new(&order.delivery_info),
            Cell::new(&order.delivery_date),
            Cell::new(euros(order.price)),
            Cell::new(note),
        ]);
        total += order.price;
        count += 1;
    }
    table.add_row(vec![
        Cell::new(format!("{count} orders").bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(euros(total).bold()),
        Cell::new(""),
    ]);
    table.to_string()
}

pub fn run(
    base_dir: Option<&str>,
    offline: bool,
    archived_only: bool,
    active_only: bool,
) -> Result<()> {
    let settings = load_settings();
    settings.validate()?;
    let base_dir = resolve_base_dir(base_dir, &settings);
    let source = rate_source(&settings, offline)?;

    let prepared = prepare(&base_dir, &settings, source.as_ref())?;
    print_rate_summary(&prepared, &settings.base_currency, &settings.quote_currency);

    let orders = prepared
        .orders()
        .filter(|o| !(archived_only && !o.is_archived) && !(active_only && o.is_archived));
    println!("{}", format_orders(orders));
    Ok(())
}
