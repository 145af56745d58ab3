use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MarketDate, Symbol, UtcDateTime, ValidationError};

/// Canonical asset category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Equity,
    Etf,
    Index,
    Crypto,
    Forex,
    Commodity,
    Other,
}

/// One trading period of price history.
///
/// Any price field may be absent (providers report gaps); the date is
/// mandatory. When all four prices are present the constructor enforces
/// low <= min(open, close) <= max(open, close) <= high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    pub ts: MarketDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl OhlcPoint {
    pub fn new(
        ts: MarketDate,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_optional_price("open", open)?;
        validate_optional_price("high", high)?;
        validate_optional_price("low", low)?;
        validate_optional_price("close", close)?;

        if let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) {
            let body_low = open.min(close);
            let body_high = open.max(close);
            if low > body_low || body_high > high {
                return Err(ValidationError::OhlcBoundsViolated {
                    ts: ts.format_iso(),
                });
            }
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
        })
    }

    /// True when all four price fields are present.
    pub const fn is_complete(&self) -> bool {
        self.open.is_some() && self.high.is_some() && self.low.is_some() && self.close.is_some()
    }

    /// High minus low, when both ends of the range are known.
    pub fn day_range(&self) -> Option<f64> {
        Some(self.high? - self.low?)
    }
}

/// Price history for one asset, ascending by date with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcSeries {
    pub symbol: Symbol,
    pub points: Vec<OhlcPoint>,
}

impl OhlcSeries {
    pub fn new(symbol: Symbol, points: Vec<OhlcPoint>) -> Result<Self, ValidationError> {
        for (index, pair) in points.windows(2).enumerate() {
            if pair[0].ts >= pair[1].ts {
                return Err(ValidationError::UnorderedSeries { index: index + 1 });
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point, if any.
    pub fn latest(&self) -> Option<&OhlcPoint> {
        self.points.last()
    }
}

/// One extracted news item, associated with the assets it mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    pub headline: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<UtcDateTime>,
    pub symbols: Vec<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl NewsItem {
    pub fn new(
        source: impl Into<String>,
        headline: impl Into<String>,
        summary: impl Into<String>,
        published: Option<UtcDateTime>,
        symbols: Vec<Symbol>,
        link: Option<String>,
    ) -> Result<Self, ValidationError> {
        let headline = headline.into();
        if headline.trim().is_empty() {
            return Err(ValidationError::EmptyHeadline);
        }

        Ok(Self {
            source: source.into(),
            headline,
            summary: summary.into(),
            published,
            symbols,
            link,
        })
    }

    pub fn mentions(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }
}

/// Overall market sentiment label produced by the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

impl FromStr for Sentiment {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            "mixed" => Ok(Self::Mixed),
            _ => Err(ValidationError::InvalidSentiment {
                value: input.to_owned(),
            }),
        }
    }
}

/// Condensed per-asset market summary derived from collected news.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub symbol: Symbol,
    pub text: String,
    pub sentiment: Sentiment,
}

impl MarketSummary {
    pub fn new(
        symbol: Symbol,
        text: impl Into<String>,
        sentiment: Sentiment,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptySummaryText);
        }

        Ok(Self {
            symbol,
            text,
            sentiment,
        })
    }
}

fn validate_optional_price(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field });
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeValue { field });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(input: &str) -> MarketDate {
        MarketDate::parse(input).expect("test date must parse")
    }

    #[test]
    fn accepts_complete_point_within_bounds() {
        let point = OhlcPoint::new(
            date("2024-01-02"),
            Some(10.0),
            Some(12.0),
            Some(9.5),
            Some(11.0),
        )
        .expect("point should be valid");
        assert!(point.is_complete());
        assert_eq!(point.day_range(), Some(2.5));
    }

    #[test]
    fn rejects_point_violating_ohlc_bounds() {
        let err = OhlcPoint::new(
            date("2024-01-02"),
            Some(10.0),
            Some(12.0),
            Some(9.0),
            Some(12.5),
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::OhlcBoundsViolated { .. }));
    }

    #[test]
    fn accepts_partial_point_with_date_only() {
        let point =
            OhlcPoint::new(date("2024-01-02"), None, None, None, None).expect("gaps are valid");
        assert!(!point.is_complete());
        assert_eq!(point.day_range(), None);
    }

    #[test]
    fn rejects_negative_price() {
        let err = OhlcPoint::new(date("2024-01-02"), Some(-1.0), None, None, None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { field: "open" }));
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let symbol = Symbol::parse("AAA").expect("valid");
        let point = OhlcPoint::new(date("2024-01-02"), None, None, None, None).expect("valid");
        let err = OhlcSeries::new(symbol, vec![point, point]).expect_err("must fail");
        assert!(matches!(err, ValidationError::UnorderedSeries { index: 1 }));
    }

    #[test]
    fn news_item_requires_headline() {
        let err = NewsItem::new("wire", "  ", "body", None, Vec::new(), None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyHeadline));
    }

    #[test]
    fn sentiment_parses_case_insensitively() {
        assert_eq!("Mixed".parse::<Sentiment>().expect("valid"), Sentiment::Mixed);
        assert!("bullish".parse::<Sentiment>().is_err());
    }
}
