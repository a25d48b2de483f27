//! Computes every configured indicator over one candle window.

use crate::domain::candle::{closes, highs, lows, Candle};
use crate::domain::indicator::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi,
    calculate_sma, calculate_stochastic, BollingerBands, IndicatorType, Macd, Stochastic,
};
use crate::domain::settings::{IndicatorSettings, MaType};

/// Indicator series for one window. Disabled indicators are empty; every
/// series is right-aligned with the candle window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub rsi: Vec<f64>,
    pub fast_ma: Vec<f64>,
    pub slow_ma: Vec<f64>,
    pub bollinger: BollingerBands,
    pub macd: Macd,
    pub stochastic: Stochastic,
    pub atr: Vec<f64>,
}

pub fn compute_indicators(candles: &[Candle], settings: &IndicatorSettings) -> IndicatorSet {
    let close = closes(candles);
    let mut set = IndicatorSet::default();

    if settings.rsi.enabled {
        set.rsi = calculate_rsi(&close, settings.rsi.period);
    }

    if settings.ma.enabled {
        let ma = match settings.ma.ma_type {
            MaType::Sma => calculate_sma,
            MaType::Ema => calculate_ema,
        };
        set.fast_ma = ma(&close, settings.ma.fast);
        set.slow_ma = ma(&close, settings.ma.slow);
    }

    if settings.bollinger.enabled {
        set.bollinger = calculate_bollinger(
            &close,
            settings.bollinger.period,
            settings.bollinger.deviation,
        );
    }

    if settings.macd.enabled {
        set.macd = calculate_macd(
            &close,
            settings.macd.fast,
            settings.macd.slow,
            settings.macd.signal,
        );
    }

    if settings.stochastic.enabled || settings.atr.enabled {
        let high = highs(candles);
        let low = lows(candles);

        if settings.stochastic.enabled {
            set.stochastic = calculate_stochastic(
                &high,
                &low,
                &close,
                settings.stochastic.period,
                settings.stochastic.smooth_k,
                settings.stochastic.smooth_d,
            );
        }
        if settings.atr.enabled {
            set.atr = calculate_atr(&high, &low, &close, settings.atr.period);
        }
    }

    set
}

/// The enabled indicators and their parameters, in display order.
pub fn enabled_indicator_types(settings: &IndicatorSettings) -> Vec<IndicatorType> {
    let mut types = Vec::new();
    if settings.rsi.enabled {
        types.push(IndicatorType::Rsi(settings.rsi.period));
    }
    if settings.ma.enabled {
        for period in [settings.ma.fast, settings.ma.slow] {
            types.push(match settings.ma.ma_type {
                MaType::Sma => IndicatorType::Sma(period),
                MaType::Ema => IndicatorType::Ema(period),
            });
        }
    }
    if settings.bollinger.enabled {
        types.push(IndicatorType::Bollinger {
            period: settings.bollinger.period,
            deviation_x100: (settings.bollinger.deviation * 100.0).round() as u32,
        });
    }
    if settings.macd.enabled {
        types.push(IndicatorType::Macd {
            fast: settings.macd.fast,
            slow: settings.macd.slow,
            signal: settings.macd.signal,
        });
    }
    if settings.stochastic.enabled {
        types.push(IndicatorType::Stochastic {
            period: settings.stochastic.period,
            smooth_k: settings.stochastic.smooth_k,
            smooth_d: settings.stochastic.smooth_d,
        });
    }
    if settings.atr.enabled {
        types.push(IndicatorType::Atr(settings.atr.period));
    }
    types
}
