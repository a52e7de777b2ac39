//! 金额与币种值对象

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// ISO 4217 现行字母代码
const ISO_4217_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD",
    "CDF", "CHF", "CLP", "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK", "DOP", "DZD",
    "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ",
    "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD",
    "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR",
    "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR",
    "MWK", "MXN", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN",
    "PGK", "PHP", "PKR", "PLN", "PYG", "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR",
    "SDG", "SEK", "SGD", "SHP", "SLE", "SOS", "SRD", "SSP", "STN", "SYP", "SZL", "THB", "TJS",
    "TMT", "TND", "TOP", "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "UYU", "UZS", "VES",
    "VND", "VUV", "WST", "XAF", "XCD", "XOF", "XPF", "YER", "ZAR", "ZMW", "ZWL",
];

/// 币种（ISO 4217 字母代码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub fn jpy() -> Self {
        Self(*b"JPY")
    }

    pub fn as_str(&self) -> &str {
        // 构造时已保证为 ASCII 大写字母
        std::str::from_utf8(&self.0).unwrap_or("XXX")
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(code: &str) -> DomainResult<Self> {
        let code = code.trim();
        if !ISO_4217_CODES.contains(&code) {
            return Err(DomainError::invalid_argument(format!(
                "unsupported currency code: {code}"
            )));
        }
        let bytes = code.as_bytes();
        Ok(Self([bytes[0], bytes[1], bytes[2]]))
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 金额值对象，金额不能为负
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::invalid_argument(format!(
                "amount must not be negative: {amount}"
            )));
        }
        Ok(Self { amount, currency })
    }

    /// 日元金额
    pub fn yen(amount: Decimal) -> DomainResult<Self> {
        Self::new(amount, Currency::jpy())
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| {
                DomainError::invalid_argument(format!("amount overflow: {self} + {other}"))
            })?;
        Money::new(amount, self.currency)
    }

    pub fn subtract(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| {
                DomainError::invalid_argument(format!("amount overflow: {self} - {other}"))
            })?;
        Money::new(amount, self.currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    fn ensure_same_currency(&self, other: &Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::invalid_argument(format!(
                "currency mismatch: {} vs {}",
                self.currency, other.currency
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        "USD".parse().unwrap()
    }

    #[test]
    fn test_currency_validation() {
        assert_eq!("EUR".parse::<Currency>().unwrap().as_str(), "EUR");
        assert!("eur".parse::<Currency>().is_err());
        assert!("ABC".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(Money::yen(Decimal::new(-1, 0)).is_err());
        assert!(Money::yen(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn test_add_and_subtract() {
        let a = Money::yen(Decimal::new(1500, 0)).unwrap();
        let b = Money::yen(Decimal::new(500, 0)).unwrap();
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(2000, 0));
        assert_eq!(a.subtract(&b).unwrap().amount(), Decimal::new(1000, 0));
        assert!(b.subtract(&a).is_err());
    }

    #[test]
    fn test_add_overflow_is_an_error() {
        let max = Money::yen(Decimal::MAX).unwrap();
        let err = max.add(&max).unwrap_err();
        assert!(err.to_string().contains("amount overflow"));
    }

    #[test]
    fn test_currency_mismatch() {
        let yen = Money::yen(Decimal::ONE).unwrap();
        let dollars = Money::new(Decimal::ONE, usd()).unwrap();
        let err = yen.add(&dollars).unwrap_err();
        assert!(err.to_string().contains("currency mismatch"));
    }

    #[test]
    fn test_is_positive() {
        assert!(Money::yen(Decimal::new(1, 2)).unwrap().is_positive());
        assert!(!Money::zero(Currency::jpy()).is_positive());
    }
}
