use canteen_config::Config;
use canteen_core::{CurrencyFormatter, DateFormatter};
use canteen_domain::DayKey;
use rust_decimal::{Decimal, RoundingStrategy};

/// Money and date rendering driven by the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency_symbol: String,
    decimal_separator: char,
    day_first: bool,
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            decimal_separator: config.decimal_separator,
            day_first: !config.locale.to_ascii_lowercase().starts_with("en-us"),
        }
    }

    fn grouping_separator(&self) -> char {
        if self.decimal_separator == ',' {
            '.'
        } else {
            ','
        }
    }
}

impl CurrencyFormatter for CliFormatters {
    /// Two decimals with thousands grouping, e.g. `R$ 1.234,50`.
    fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount
            .abs()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let fixed = format!("{rounded:.2}");
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::new();
        for (index, digit) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(self.grouping_separator());
            }
            grouped.push(digit);
        }

        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{sign}{} {grouped}{}{cents}",
            self.currency_symbol, self.decimal_separator
        )
    }
}

impl DateFormatter for CliFormatters {
    fn format_day(&self, day: DayKey) -> String {
        if self.day_first {
            day.date().format("%d/%m/%Y").to_string()
        } else {
            day.date().format("%m/%d/%Y").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_config_renders_reais() {
        let formatters = CliFormatters::from_config(&Config::default());
        assert_eq!(formatters.format_amount(dec!(7)), "R$ 7,00");
        assert_eq!(formatters.format_amount(dec!(1234.5)), "R$ 1.234,50");
        assert_eq!(formatters.format_amount(dec!(1000000)), "R$ 1.000.000,00");
        assert_eq!(formatters.format_amount(dec!(0.005)), "R$ 0,01");
        assert_eq!(
            formatters.format_day("2024-05-10".parse().unwrap()),
            "10/05/2024"
        );
    }

    #[test]
    fn dot_separator_groups_with_commas() {
        let mut config = Config::default();
        config.set("currency_symbol", "$").unwrap();
        config.set("decimal_separator", ".").unwrap();
        config.set("locale", "en-US").unwrap();
        let formatters = CliFormatters::from_config(&config);
        assert_eq!(formatters.format_amount(dec!(2500.25)), "$ 2,500.25");
        assert_eq!(formatters.format_amount(dec!(-3)), "-$ 3.00");
        assert_eq!(
            formatters.format_day("2024-05-10".parse().unwrap()),
            "05/10/2024"
        );
    }
}
