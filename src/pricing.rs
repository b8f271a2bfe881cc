/// A cart row joined with the catalog fields pricing needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: i32,
    pub quantity: i32,
    pub price: f64,
    pub tax_percent: Option<f64>,
}

/// An order line with its unit price fixed at checkout time.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartQuote {
    pub total: f64,
    pub lines: Vec<PricedLine>,
}

/// Unit price including tax. A missing tax percentage counts as zero.
pub fn tax_inclusive_price(price: f64, tax_percent: Option<f64>) -> f64 {
    price + price * tax_percent.unwrap_or(0.0) / 100.0
}

/// Prices every line and accumulates the total in cart order.
pub fn quote_cart(lines: &[CartLine]) -> CartQuote {
    let mut total = 0.0_f64;
    let mut priced = Vec::with_capacity(lines.len());

    for line in lines {
        let unit_price = tax_inclusive_price(line.price, line.tax_percent);
        total += unit_price * f64::from(line.quantity);
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
        });
    }

    CartQuote {
        total,
        lines: priced,
    }
}

/// Σ quantity × price over client-supplied lines, used to flag totals that
/// disagree with their own items.
pub fn lines_total(lines: impl IntoIterator<Item = (i32, f64)>) -> f64 {
    lines
        .into_iter()
        .fold(0.0, |acc, (quantity, price)| acc + price * f64::from(quantity))
}

/// Two totals agree when they differ by less than half a cent.
pub fn totals_match(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.005
}
