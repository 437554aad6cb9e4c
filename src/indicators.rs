use crate::binance::Candle;
use ta::indicators::{AverageTrueRange, RelativeStrengthIndex};
use ta::{DataItem, Next};

/// Latest RSI over the close prices, rounded to 2 decimals.
///
/// Returns `None` when the series is shorter than the period or the
/// indicator cannot be evaluated.
pub fn rsi(candles: &[Candle], period: usize) -> Option<f64> {
    if candles.len() < period {
        return None;
    }
    let mut indicator = RelativeStrengthIndex::new(period).ok()?;

    let mut last_rsi = None;
    for candle in candles {
        last_rsi = Some(indicator.next(candle.close));
    }
    last_rsi.filter(|v| v.is_finite()).map(round2)
}

/// Latest ATR expressed as a percentage of the latest close price,
/// rounded to 2 decimals.
pub fn atr_percent(candles: &[Candle], period: usize) -> Option<f64> {
    if candles.len() < period {
        return None;
    }
    let mut indicator = AverageTrueRange::new(period).ok()?;

    let mut last_atr = None;
    for candle in candles {
        // Rows the ta crate considers inconsistent (e.g. high < low) are skipped.
        let item = DataItem::builder()
            .open(candle.open)
            .high(candle.high)
            .low(candle.low)
            .close(candle.close)
            .volume(candle.volume)
            .build();
        if let Ok(item) = item {
            last_atr = Some(indicator.next(&item));
        }
    }

    let atr = last_atr.filter(|v| v.is_finite())?;
    let latest_close = candles.last()?.close;
    if latest_close <= 0.0 {
        return None;
    }
    Some(round2(atr / latest_close * 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
