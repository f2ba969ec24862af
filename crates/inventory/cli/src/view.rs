use std::io::{self, Write};

use inventory_api::product::Product;

/// Screen shown to the user.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    LoggedOut,
    LoggedIn,
}

/// Severity of an alert or a stock badge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Rendering surface driven by the product manager.
pub trait View {
    fn show_view(&mut self, state: ViewState);

    fn show_alert(&mut self, level: Level, message: &str);

    fn show_loading(&mut self, loading: bool);

    fn render_products(&mut self, products: &[Product]);

    /// Asks a yes/no question; anything but an explicit yes declines.
    fn confirm(&mut self, message: &str) -> bool;
}

pub const EMPTY_MESSAGE: &str = "No products registered";

pub fn stock_level(stock: i32) -> Level {
    match stock {
        0 => Level::Danger,
        1..=9 => Level::Warning,
        _ => Level::Success,
    }
}

pub fn stock_text(stock: i32) -> String {
    match stock {
        0 => "Out of stock".into(),
        stock => format!("Stock: {stock}"),
    }
}

/// Formats one product as a plain-text card.
pub fn render_card(product: &Product) -> String {
    let Product {
        id,
        name,
        description,
        retail_price,
        wholesale_price,
        location,
        stock,
        created_at: _,
        updated_at,
    } = product;

    let mut lines = vec![format!(
        "{name}  [{text}] ({level})",
        text = stock_text(*stock),
        level = stock_level(*stock).as_str(),
    )];
    if *stock == 0 {
        lines.push("  ! This product is out of stock".into());
    }

    let description = if description.trim().is_empty() {
        "No description"
    } else {
        description.as_str()
    };
    lines.push(format!("  {description}"));
    lines.push(format!(
        "  Retail: ${retail_price:.2}  Wholesale: ${wholesale_price:.2}"
    ));
    lines.push(format!("  Location: {location}"));
    lines.push(format!("  Id: {id}  (updated {})", updated_at.to_rfc3339()));
    lines.join("\n")
}

/// Draws cards on stdout and alerts on stderr.
#[derive(Debug, Default)]
pub struct TerminalView {
    state: Option<ViewState>,
}

impl TerminalView {
    pub fn state(&self) -> Option<ViewState> {
        self.state
    }
}

impl View for TerminalView {
    fn show_view(&mut self, state: ViewState) {
        self.state = Some(state);
        if state == ViewState::LoggedOut {
            eprintln!("Not logged in. Run `inventory login` to continue.");
        }
    }

    fn show_alert(&mut self, level: Level, message: &str) {
        eprintln!("[{}] {message}", level.as_str());
    }

    fn show_loading(&mut self, _loading: bool) {}

    fn render_products(&mut self, products: &[Product]) {
        let mut stdout = io::stdout().lock();
        let result = if products.is_empty() {
            writeln!(stdout, "{EMPTY_MESSAGE}")
        } else {
            products
                .iter()
                .map(|product| writeln!(stdout, "{}\n", render_card(product)))
                .collect()
        };
        if let Err(error) = result {
            eprintln!("failed to write to stdout: {error}");
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        match ::inquire::Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => answer,
            Err(error) => {
                eprintln!("failed to read the answer: {error}");
                false
            }
        }
    }
}
