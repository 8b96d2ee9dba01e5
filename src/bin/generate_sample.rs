use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

// Column order matches the loader's required schema.
const HEADER: [&str; 9] = [
    "OrderID",
    "Date",
    "Region",
    "Category",
    "Product",
    "Store",
    "CustomerSegment",
    "PaymentMethod",
    "TotalRevenue",
];

struct ProductLine {
    category: &'static str,
    products: &'static [&'static str],
    price_range: (f64, f64),
}

const CATALOG: [ProductLine; 5] = [
    ProductLine {
        category: "iPhone",
        products: &[
            "iPhone 15",
            "iPhone 15 Plus",
            "iPhone 15 Pro",
            "iPhone 15 Pro Max",
            "iPhone SE",
        ],
        price_range: (429.0, 1199.0),
    },
    ProductLine {
        category: "Mac",
        products: &[
            "MacBook Air",
            "MacBook Pro 14",
            "MacBook Pro 16",
            "iMac",
            "Mac mini",
            "Mac Studio",
        ],
        price_range: (599.0, 3999.0),
    },
    ProductLine {
        category: "iPad",
        products: &["iPad", "iPad mini", "iPad Air", "iPad Pro 11", "iPad Pro 13"],
        price_range: (349.0, 1299.0),
    },
    ProductLine {
        category: "Wearables",
        products: &[
            "Apple Watch SE",
            "Apple Watch Series 9",
            "Apple Watch Ultra 2",
            "AirPods",
            "AirPods Pro",
            "AirPods Max",
        ],
        price_range: (129.0, 799.0),
    },
    ProductLine {
        category: "Accessories",
        products: &[
            "Magic Keyboard",
            "Magic Mouse",
            "Apple Pencil Pro",
            "AirTag",
            "MagSafe Charger",
            "Smart Folio",
        ],
        price_range: (29.0, 349.0),
    },
];

// Stores grouped by sales region so the generated rows stay coherent.
const REGIONS: [(&str, [&str; 4]); 5] = [
    (
        "Americas",
        ["Fifth Avenue", "Michigan Avenue", "Union Square", "Yorkdale"],
    ),
    (
        "Europe",
        ["Regent Street", "Opera", "Kurfurstendamm", "Passeig de Gracia"],
    ),
    (
        "Greater China",
        ["Nanjing East", "Pudong", "Sanlitun", "Causeway Bay"],
    ),
    ("Japan", ["Ginza", "Shibuya", "Shinjuku", "Omotesando"]),
    (
        "Rest of Asia Pacific",
        ["Orchard Road", "Sydney", "Marina Bay Sands", "Gangnam"],
    ),
];

const SEGMENTS: [&str; 3] = ["Consumer", "Enterprise", "Education"];
const PAYMENT_METHODS: [&str; 4] = ["Credit Card", "Debit Card", "Apple Pay", "Gift Card"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn index(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn utf8_column(values: &[String]) -> ArrayRef {
    Arc::new(StringArray::from(
        values.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    ))
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let rows: usize = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("row count '{raw}' is not a number"))?,
        None => 1000,
    };
    let stem = args.next().unwrap_or_else(|| "sales_data".to_string());

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid calendar date");

    let mut order_ids: Vec<String> = Vec::with_capacity(rows);
    let mut dates: Vec<String> = Vec::with_capacity(rows);
    let mut regions: Vec<String> = Vec::with_capacity(rows);
    let mut categories: Vec<String> = Vec::with_capacity(rows);
    let mut products: Vec<String> = Vec::with_capacity(rows);
    let mut stores: Vec<String> = Vec::with_capacity(rows);
    let mut segments: Vec<String> = Vec::with_capacity(rows);
    let mut payments: Vec<String> = Vec::with_capacity(rows);
    let mut revenues: Vec<f64> = Vec::with_capacity(rows);

    for i in 0..rows {
        let (region, region_stores) = &REGIONS[rng.index(REGIONS.len())];
        let line = &CATALOG[rng.index(CATALOG.len())];
        let product = line.products[rng.index(line.products.len())];
        let (lo, hi) = line.price_range;
        let unit_price = (lo + rng.next_f64() * (hi - lo)).round();
        let quantity = 1 + rng.index(5) as u32;
        // 2024 is a leap year: offsets 0..366 cover the whole calendar.
        let date = start + Days::new(rng.index(366) as u64);

        order_ids.push(format!("ORD-{:06}", i + 1));
        dates.push(date.format("%Y-%m-%d").to_string());
        regions.push((*region).to_string());
        categories.push(line.category.to_string());
        products.push(product.to_string());
        stores.push(region_stores[rng.index(region_stores.len())].to_string());
        segments.push(SEGMENTS[rng.index(SEGMENTS.len())].to_string());
        payments.push(PAYMENT_METHODS[rng.index(PAYMENT_METHODS.len())].to_string());
        revenues.push(unit_price * f64::from(quantity));
    }

    // ---- CSV ----
    let csv_path = format!("{stem}.csv");
    let mut writer =
        csv::Writer::from_path(&csv_path).with_context(|| format!("creating {csv_path}"))?;
    writer.write_record(HEADER)?;
    for i in 0..rows {
        let revenue = revenues[i].to_string();
        writer.write_record([
            order_ids[i].as_str(),
            dates[i].as_str(),
            regions[i].as_str(),
            categories[i].as_str(),
            products[i].as_str(),
            stores[i].as_str(),
            segments[i].as_str(),
            payments[i].as_str(),
            revenue.as_str(),
        ])?;
    }
    writer.flush()?;

    // ---- Parquet ----
    let mut fields: Vec<Field> = HEADER[..8]
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .collect();
    fields.push(Field::new(HEADER[8], DataType::Float64, false));
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = vec![
        utf8_column(&order_ids),
        utf8_column(&dates),
        utf8_column(&regions),
        utf8_column(&categories),
        utf8_column(&products),
        utf8_column(&stores),
        utf8_column(&segments),
        utf8_column(&payments),
        Arc::new(Float64Array::from(revenues)),
    ];
    let batch =
        RecordBatch::try_new(schema.clone(), columns).context("assembling record batch")?;

    let parquet_path = format!("{stem}.parquet");
    let file = File::create(&parquet_path).with_context(|| format!("creating {parquet_path}"))?;
    let mut parquet_writer = ArrowWriter::try_new(file, schema, None)?;
    parquet_writer.write(&batch)?;
    parquet_writer.close()?;

    println!("Wrote {rows} sales records to {csv_path} and {parquet_path}");
    Ok(())
}
