//! Discount and order total arithmetic.
//!
//! Money carries two decimal places everywhere: inputs with more are
//! rejected and the discounted unit price is rounded half away from zero,
//! so stored columns never round a value behind our back.

use crate::entities::painting;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for every amount and percentage.
pub const MONEY_SCALE: u32 = 2;

/// Largest unit price the `paintings.price` column holds (`numeric(12,2)`).
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Largest order total the `orders.total_amount` column holds (`numeric(14,2)`).
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Upper bound for a painting's rating.
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Price of a single unit once the percentage discount is applied, in cents.
pub fn final_price(price: Decimal, discount: Decimal) -> Decimal {
    (price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED))
        .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Whether `value` has no more than `scale` significant decimal places.
pub fn fits_scale(value: Decimal, scale: u32) -> bool {
    value.normalize().scale() <= scale
}

/// Whether `price` is a positive amount with at most two decimals that fits its column.
pub fn is_valid_price(price: Decimal) -> bool {
    price > Decimal::ZERO && price <= MAX_PRICE && fits_scale(price, MONEY_SCALE)
}

/// Whether `rating` is within 0 to 5 with at most one decimal.
pub fn is_valid_rating(rating: Decimal) -> bool {
    rating >= Decimal::ZERO && rating <= MAX_RATING && fits_scale(rating, 1)
}

/// Unit and line amounts for one order line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinePricing {
    pub final_price: Decimal,
    pub line_total: Decimal,
}

/// Prices `quantity` units of `painting` at its current price and discount.
///
/// Returns `None` if the line total overflows.
pub fn compute_line_item(painting: &painting::Model, quantity: u32) -> Option<LinePricing> {
    let final_price = final_price(painting.price, painting.discount);
    let line_total = final_price.checked_mul(Decimal::from(quantity))?;
    Some(LinePricing {
        final_price,
        line_total,
    })
}

/// Sum of all line totals. `None` on overflow or past [`MAX_ORDER_TOTAL`].
pub fn compute_order_total<'a, I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a LinePricing>,
{
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.line_total))
        .filter(|total| *total <= MAX_ORDER_TOTAL)
}

/// Whether `discount` is a percentage between 0 and 100 with at most two decimals.
pub fn is_valid_discount(discount: Decimal) -> bool {
    discount >= Decimal::ZERO
        && discount <= Decimal::ONE_HUNDRED
        && fits_scale(discount, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{painting::Season, types::*};
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn painting_at(price: Decimal, discount: Decimal) -> painting::Model {
        let now = Utc::now();
        painting::Model {
            id: Uuid::new_v4(),
            title: "Monsoon".into(),
            description: "Oil on canvas".into(),
            image_urls: StringList(vec!["https://img.test/1.jpg".into()]),
            category: None,
            theme: "General".into(),
            price,
            discount,
            final_price: final_price(price, discount),
            season_or_festival: Season::Other,
            dimensions: Dimensions::default(),
            materials: StringList::default(),
            stock: 1,
            rating: Decimal::ZERO,
            comments: Comments::default(),
            likes: IdList::default(),
            artist_id: Uuid::new_v4(),
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ten_percent_off_a_thousand() {
        assert_eq!(final_price(dec!(1000), dec!(10)), dec!(900));
    }

    #[test]
    fn zero_and_full_discount() {
        assert_eq!(final_price(dec!(450.50), Decimal::ZERO), dec!(450.50));
        assert_eq!(final_price(dec!(450.50), dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn two_units_of_discounted_painting() {
        let painting = painting_at(dec!(1000), dec!(10));
        let line = compute_line_item(&painting, 2).unwrap();
        assert_eq!(line.final_price, dec!(900));
        assert_eq!(line.line_total, dec!(1800));
        assert_eq!(compute_order_total([&line]), Some(dec!(1800)));
    }

    #[test]
    fn order_total_sums_lines() {
        let a = compute_line_item(&painting_at(dec!(1000), dec!(10)), 2).unwrap();
        let b = compute_line_item(&painting_at(dec!(250), dec!(0)), 3).unwrap();
        assert_eq!(compute_order_total(&[a, b]), Some(dec!(2550)));
        assert_eq!(compute_order_total(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn discount_bounds() {
        assert!(is_valid_discount(dec!(0)));
        assert!(is_valid_discount(dec!(100)));
        assert!(is_valid_discount(dec!(33.33)));
        assert!(!is_valid_discount(dec!(-1)));
        assert!(!is_valid_discount(dec!(100.01)));
        assert!(!is_valid_discount(dec!(12.345)));
    }

    #[test]
    fn column_bounds_match_their_literals() {
        assert_eq!(MAX_PRICE, dec!(9999999999.99));
        assert_eq!(MAX_ORDER_TOTAL, dec!(999999999999.99));
        assert_eq!(MAX_RATING, dec!(5));
    }

    #[test]
    fn fractional_discount_rounds_to_cents() {
        assert_eq!(final_price(dec!(999.99), dec!(33.33)), dec!(666.69));
        // 0.005 rounds away from zero
        assert_eq!(final_price(dec!(0.05), dec!(90)), dec!(0.01));

        let line = compute_line_item(&painting_at(dec!(999.99), dec!(33.33)), 3).unwrap();
        assert_eq!(line.final_price, dec!(666.69));
        assert_eq!(line.line_total, dec!(2000.07));
        assert_eq!(compute_order_total([&line]), Some(dec!(2000.07)));
    }

    #[test]
    fn price_and_rating_limits() {
        assert!(is_valid_price(dec!(0.01)));
        assert!(is_valid_price(dec!(9999999999.99)));
        assert!(is_valid_price(dec!(1000.50)));
        assert!(!is_valid_price(dec!(10000000000)));
        assert!(!is_valid_price(dec!(10.001)));
        assert!(!is_valid_price(Decimal::ZERO));

        assert!(is_valid_rating(dec!(4.5)));
        assert!(!is_valid_rating(dec!(100)));
        assert!(!is_valid_rating(dec!(4.25)));
        assert!(!is_valid_rating(dec!(-1)));
    }

    #[test]
    fn oversized_order_total_is_rejected() {
        let line = compute_line_item(&painting_at(MAX_PRICE, Decimal::ZERO), 101).unwrap();
        assert_eq!(compute_order_total([&line]), None);
    }

    proptest! {
        #[test]
        fn line_total_is_final_price_times_quantity(
            cents in 1i64..10_000_000,
            discount in 0u32..=100,
            quantity in 1u32..500,
        ) {
            let price = Decimal::new(cents, 2);
            let discount = Decimal::from(discount);
            let line = compute_line_item(&painting_at(price, discount), quantity).unwrap();
            let exact = price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED);
            prop_assert!((line.final_price - exact).abs() <= dec!(0.005));
            prop_assert!(fits_scale(line.final_price, MONEY_SCALE));
            prop_assert_eq!(line.line_total, line.final_price * Decimal::from(quantity));
            prop_assert!(line.final_price <= price);
            prop_assert!(line.final_price >= Decimal::ZERO);
        }
    }
}
