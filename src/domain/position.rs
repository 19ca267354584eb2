//! Single long position state and the closed-trade record.

use chrono::NaiveDate;

/// Simulator position state. At most one unit long, never short.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long {
        entry_price: f64,
        entry_date: NaiveDate,
    },
}

impl Position {
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    /// Open a long position. A no-op when already long.
    pub fn enter(&mut self, date: NaiveDate, price: f64) -> bool {
        match self {
            Position::Flat => {
                *self = Position::Long {
                    entry_price: price,
                    entry_date: date,
                };
                true
            }
            Position::Long { .. } => false,
        }
    }

    /// Close the position and return the realized trade. `None` when flat.
    pub fn exit(&mut self, date: NaiveDate, price: f64) -> Option<Trade> {
        match *self {
            Position::Flat => None,
            Position::Long {
                entry_price,
                entry_date,
            } => {
                *self = Position::Flat;
                Some(Trade::new(entry_date, entry_price, date, price))
            }
        }
    }

    pub fn unrealized_return(&self, price: f64) -> Option<f64> {
        match self {
            Position::Flat => None,
            Position::Long { entry_price, .. } => Some((price - entry_price) / entry_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub trade_return: f64,
}

impl Trade {
    pub fn new(entry_date: NaiveDate, entry_price: f64, exit_date: NaiveDate, exit_price: f64) -> Self {
        Self {
            entry_date,
            entry_price,
            exit_date,
            exit_price,
            trade_return: (exit_price - entry_price) / entry_price,
        }
    }

    pub fn is_win(&self) -> bool {
        self.trade_return > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.trade_return < 0.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn starts_flat() {
        let pos = Position::default();
        assert!(pos.is_flat());
        assert!(!pos.is_long());
        assert_eq!(pos.unrealized_return(100.0), None);
    }

    #[test]
    fn enter_then_exit_produces_trade() {
        let mut pos = Position::Flat;
        assert!(pos.enter(date(2), 50.0));
        assert!(pos.is_long());

        let trade = pos.exit(date(5), 55.0).unwrap();
        assert!(pos.is_flat());
        assert_eq!(trade.entry_date, date(2));
        assert_eq!(trade.exit_date, date(5));
        assert!((trade.trade_return - 0.1).abs() < 1e-12);
        assert!(trade.is_win());
        assert_eq!(trade.holding_days(), 3);
    }

    #[test]
    fn enter_while_long_is_noop() {
        let mut pos = Position::Flat;
        pos.enter(date(1), 50.0);
        assert!(!pos.enter(date(2), 60.0));
        assert_eq!(
            pos,
            Position::Long {
                entry_price: 50.0,
                entry_date: date(1)
            }
        );
    }

    #[test]
    fn exit_while_flat_is_noop() {
        let mut pos = Position::Flat;
        assert!(pos.exit(date(1), 50.0).is_none());
        assert!(pos.is_flat());
    }

    #[test]
    fn unrealized_return_while_long() {
        let mut pos = Position::Flat;
        pos.enter(date(1), 100.0);
        assert!((pos.unrealized_return(90.0).unwrap() - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn breakeven_trade_is_neither_win_nor_loss() {
        let trade = Trade::new(date(1), 100.0, date(2), 100.0);
        assert!(!trade.is_win());
        assert!(!trade.is_loss());
        assert_eq!(trade.trade_return, 0.0);
    }
}
