//! Order specifications and the preparation-time policy built on them.

use super::Order;

/// A business rule an order either satisfies or not.
pub trait OrderSpecification {
    fn is_satisfied_by(&self, order: &Order) -> bool;

    /// Combines two specifications; both must hold.
    fn and<S>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
        S: OrderSpecification,
    {
        And(self, other)
    }
}

/// Orders whose total reaches a minimum, in minor units of the order currency.
#[derive(Debug, Clone, Copy)]
pub struct LargeOrder {
    pub min_total: i64,
}

impl OrderSpecification for LargeOrder {
    fn is_satisfied_by(&self, order: &Order) -> bool {
        order.total_amount().amount() >= self.min_total
    }
}

/// Orders small enough to be rushed.
#[derive(Debug, Clone, Copy)]
pub struct RushOrder {
    pub max_lines: usize,
}

impl OrderSpecification for RushOrder {
    fn is_satisfied_by(&self, order: &Order) -> bool {
        order.item_count() <= self.max_lines
    }
}

/// Conjunction of two specifications.
#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(pub A, pub B);

impl<A, B> OrderSpecification for And<A, B>
where
    A: OrderSpecification,
    B: OrderSpecification,
{
    fn is_satisfied_by(&self, order: &Order) -> bool {
        self.0.is_satisfied_by(order) && self.1.is_satisfied_by(order)
    }
}

/// Default preparation-time estimate.
#[derive(Debug, Clone, Copy)]
pub struct StandardOrderPolicy {
    large_order: LargeOrder,
}

impl StandardOrderPolicy {
    pub const BASE_MINUTES: u32 = 5;
    pub const MINUTES_PER_LINE: u32 = 2;
    pub const LARGE_ORDER_EXTRA_MINUTES: u32 = 10;

    /// 50.00 in the order currency.
    pub const LARGE_ORDER_THRESHOLD: i64 = 5000;

    pub fn new() -> Self {
        Self {
            large_order: LargeOrder {
                min_total: Self::LARGE_ORDER_THRESHOLD,
            },
        }
    }

    /// Estimates how long the store needs to prepare the order.
    pub fn estimated_preparation_minutes(&self, order: &Order) -> u32 {
        let lines = u32::try_from(order.item_count()).unwrap_or(u32::MAX);
        let mut minutes =
            Self::BASE_MINUTES.saturating_add(lines.saturating_mul(Self::MINUTES_PER_LINE));
        if self.large_order.is_satisfied_by(order) {
            minutes = minutes.saturating_add(Self::LARGE_ORDER_EXTRA_MINUTES);
        }
        minutes
    }
}

impl Default for StandardOrderPolicy {
    fn default() -> Self {
        Self::new()
    }
}
