use crate::entities::order::OrderStatus;

/// Decides which order status changes are allowed.
///
/// Cancellation always has its own rule: only a `Pending` order can be
/// cancelled, whatever the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may be overwritten with any other.
    #[default]
    Permissive,
    /// Only the forward fulfilment path and buyer cancellation.
    Strict,
}

impl TransitionPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Permissive
        }
    }

    /// Validates if a status transition is allowed
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            Self::Permissive => true,
            Self::Strict => matches!(
                (from, to),
                (OrderStatus::Pending, OrderStatus::Processing)
                    | (OrderStatus::Processing, OrderStatus::Shipped)
                    | (OrderStatus::Shipped, OrderStatus::Delivered)
                    | (OrderStatus::Pending, OrderStatus::Cancelled)
            ),
        }
    }
}

/// Whether a buyer may cancel an order currently in `status`.
pub fn can_cancel(status: OrderStatus) -> bool {
    status == OrderStatus::Pending
}

/// Terminal statuses never change under the strict policy.
pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Delivered | OrderStatus::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sea_orm::Iterable;

    #[test]
    fn permissive_allows_everything() {
        let policy = TransitionPolicy::Permissive;
        for from in OrderStatus::iter() {
            for to in OrderStatus::iter() {
                assert!(policy.allows(from, to), "{from} -> {to}");
            }
        }
    }

    #[rstest]
    #[case(OrderStatus::Pending, OrderStatus::Processing, true)]
    #[case(OrderStatus::Processing, OrderStatus::Shipped, true)]
    #[case(OrderStatus::Shipped, OrderStatus::Delivered, true)]
    #[case(OrderStatus::Pending, OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Pending, OrderStatus::Delivered, false)]
    #[case(OrderStatus::Shipped, OrderStatus::Cancelled, false)]
    #[case(OrderStatus::Delivered, OrderStatus::Pending, false)]
    #[case(OrderStatus::Cancelled, OrderStatus::Processing, false)]
    fn strict_follows_fulfilment_path(
        #[case] from: OrderStatus,
        #[case] to: OrderStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(TransitionPolicy::Strict.allows(from, to), allowed);
    }

    #[test]
    fn strict_terminal_states_are_closed() {
        for from in OrderStatus::iter().filter(|s| is_terminal(*s)) {
            for to in OrderStatus::iter() {
                assert!(!TransitionPolicy::Strict.allows(from, to));
            }
        }
    }

    #[test]
    fn only_pending_orders_cancel() {
        let cancellable: Vec<_> = OrderStatus::iter().filter(|s| can_cancel(*s)).collect();
        assert_eq!(cancellable, vec![OrderStatus::Pending]);
    }

    #[test]
    fn flag_selects_policy() {
        assert_eq!(
            TransitionPolicy::from_strict_flag(true),
            TransitionPolicy::Strict
        );
        assert_eq!(
            TransitionPolicy::from_strict_flag(false),
            TransitionPolicy::Permissive
        );
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Permissive);
    }
}
