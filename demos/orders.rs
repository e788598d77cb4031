//! Prints the orders of one sheet of a workbook. The sheet is named by the second
//! argument (`Sheet1` when omitted) and starts with the header row
//! `編號 | 項目 | 價格 | 數量 | 總價`.
//!
//! ```text
//! RUST_LOG=sheet_mapper=debug cargo run --example orders -- orders.xlsx Sheet1
//! ```

use anyhow::Context;
use anyhow::Result;
use sheet_mapper::Field;
use sheet_mapper::RecordMapping;
use sheet_mapper::SheetReader;
use sheet_mapper::SheetRecord;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct OrderModel {
    number: String,
    item: String,
    price: Option<f64>,
    quantity: Option<i32>,
    total_price: Option<f64>,
}

impl SheetRecord for OrderModel {
    fn mapping() -> RecordMapping<Self> {
        RecordMapping::new()
            .field(Field::new("Number", |o: &mut OrderModel, v| o.number = v).column_name("編號"))
            .field(Field::new("Item", |o: &mut OrderModel, v| o.item = v).column_name("項目"))
            .field(
                Field::new("Price", |o: &mut OrderModel, v| o.price = v)
                    .column_name("價格")
                    .parser(|text| text.trim_start_matches('$').replace(',', "")),
            )
            .field(Field::new("Quantity", |o: &mut OrderModel, v| o.quantity = v).column_name("數量"))
            .field(Field::new("TotalPrice", |o: &mut OrderModel, v| o.total_price = v).column_name("總價"))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: orders <workbook.xlsx> [sheet]")?;
    let sheet = args.next().unwrap_or_else(|| "Sheet1".to_owned());

    let reader = SheetReader::new()
        .open(path.as_str())
        .sheet_as(&sheet)
        .include_header(true)
        .ignore_case(true);
    for order in reader.map_to::<OrderModel>()? {
        let order = order.with_context(|| format!("Read orders from '{path}' failed"))?;
        println!(
            "{} {} {:?} x {:?} = {:?}",
            order.number, order.item, order.price, order.quantity, order.total_price
        );
    }
    Ok(())
}
