//! Property tests for the cart reducer and its snapshot encoding.

use proptest::prelude::*;
use proptest::test_runner::Config;
use tavola_core::{CartCommand, CartItem, CartState, MenuItemId, Price};

const IDS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    Set(usize, i64),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    let slot = 0..IDS.len();
    prop_oneof![
        3 => slot.clone().prop_map(Op::Add),
        1 => slot.clone().prop_map(Op::Remove),
        2 => (slot, prop_oneof![-3_i64..=12, 0_i64..=i64::from(u32::MAX) + 10])
            .prop_map(|(slot, quantity)| Op::Set(slot, quantity)),
        1 => Just(Op::Clear),
    ]
}

/// Each ID keeps one price for the whole run, up to $100 billion.
fn prices() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(0_i64..=10_000_000_000_000, IDS.len())
}

fn command(op: &Op, prices: &[i64]) -> CartCommand {
    let id = |slot: usize| IDS[slot];
    match *op {
        Op::Add(slot) => CartCommand::AddItem(CartItem::new(
            id(slot),
            format!("Dish {}", id(slot)),
            Price::from_cents(prices[slot]),
        )),
        Op::Remove(slot) => CartCommand::RemoveItem(MenuItemId::from(id(slot))),
        Op::Set(slot, quantity) => CartCommand::UpdateQuantity {
            id: MenuItemId::from(id(slot)),
            quantity,
        },
        Op::Clear => CartCommand::Clear,
    }
}

fn run(ops: &[Op], prices: &[i64]) -> CartState {
    ops.iter()
        .fold(CartState::default(), |cart, op| cart.apply(command(op, prices)))
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn total_matches_lines_after_every_command(
        prices in prices(),
        ops in proptest::collection::vec(op(), 0..64)
    ) {
        let mut cart = CartState::default();
        for op in &ops {
            cart = cart.apply(command(op, &prices));

            prop_assert!(cart.is_consistent(), "total drifted after {:?}: {:?}", op, cart);
            prop_assert!(!cart.total().is_negative());
            prop_assert!(cart.items().iter().all(|line| line.quantity >= 1));

            let mut ids: Vec<_> = cart.items().iter().map(|line| line.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.items().len());
        }
    }

    #[test]
    fn snapshot_restores_exactly(
        prices in prices(),
        ops in proptest::collection::vec(op(), 0..32)
    ) {
        let cart = run(&ops, &prices);

        let json = serde_json::to_string(&cart).expect("cart encodes");
        let restored: CartState = serde_json::from_str(&json).expect("cart decodes");

        prop_assert_eq!(&restored, &cart);
        prop_assert!(restored.is_consistent());

        let reloaded = CartState::default().apply(CartCommand::Load(restored));
        prop_assert_eq!(reloaded, cart);
    }

    #[test]
    fn adding_twice_never_duplicates(
        prices in prices(),
        ops in proptest::collection::vec(op(), 0..32),
        slot in 0..IDS.len()
    ) {
        let cart = run(&ops, &prices);
        let before = cart.line(&MenuItemId::from(IDS[slot])).map_or(0, |line| line.quantity);

        let add = Op::Add(slot);
        let after = cart.apply(command(&add, &prices));
        let line = after.line(&MenuItemId::from(IDS[slot])).expect("line exists after add");

        prop_assert_eq!(line.quantity, before.saturating_add(1));
        prop_assert_eq!(
            after.items().iter().filter(|line| line.id.as_str() == IDS[slot]).count(),
            1
        );
    }
}
