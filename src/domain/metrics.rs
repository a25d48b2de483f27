//! Trade statistics over closed positions.

use crate::domain::signal::ExitSignal;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub total_profit: f64,
    pub total_profit_percent: f64,
    pub avg_profit_percent: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
}

impl TradeStats {
    pub fn compute(trades: &[ExitSignal]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut gross_profit = 0.0;
        let mut gross_loss = 0.0;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades {
            if trade.profit > 0.0 {
                trades_won += 1;
                gross_profit += trade.profit;
                largest_win = largest_win.max(trade.profit);
            } else if trade.profit < 0.0 {
                trades_lost += 1;
                gross_loss += trade.profit.abs();
                largest_loss = largest_loss.min(trade.profit);
            } else {
                trades_breakeven += 1;
            }
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };
        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();
        let total_profit_percent: f64 = trades.iter().map(|t| t.profit_percent).sum();
        let avg_profit_percent = if total_trades > 0 {
            total_profit_percent / total_trades as f64
        } else {
            0.0
        };
        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        Self {
            total_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            total_profit,
            total_profit_percent,
            avg_profit_percent,
            largest_win,
            largest_loss,
            profit_factor,
        }
    }
}
