use modorder_rs::load_order::{sort, CycleError, DependencyGraph, EdgeData, ResolverBuilder};
use modorder_rs::package::PinState;
use modorder_rs::{PackageId, PackageRecord, ResolveOptions, TieBreak};
use modorder_rs_test_utils::*;
use proptest::prelude::*;

fn sorted(records: &[PackageRecord]) -> Vec<PackageId> {
	let report = resolve_records(records, &[], ResolveOptions::default()).expect("valid catalog");
	report.order.expect("acyclic")
}

#[test]
fn reference_order_kept_without_relations() {
	init_logging();
	let order = sorted(&[package("C"), package("A"), package("B")]);
	assert_eq!(order, ids(&["C", "A", "B"]));
}

#[test]
fn load_after_moves_package_down() {
	let order = sorted(&[package("A").load_after("B"), package("B"), package("C")]);
	assert_eq!(order, ids(&["B", "A", "C"]));
}

#[test]
fn load_after_with_force_top() {
	let order = sorted(&[package("A").load_after("B"), package("B"), package("C").pinned(PinState::ForceTop)]);
	assert_eq!(order, ids(&["C", "B", "A"]));
}

#[test]
fn pin_groups_keep_reference_order() {
	let order = sorted(&[
		package("Bottom1").pinned(PinState::ForceBottom),
		package("Free"),
		package("Top1").pinned(PinState::ForceTop),
		package("Bottom2").pinned(PinState::ForceBottom),
		package("Top2").pinned(PinState::ForceTop).load_before("Top1"),
	]);
	assert_eq!(order, ids(&["Top1", "Top2", "Free", "Bottom1", "Bottom2"]));
}

#[test]
fn package_is_placed_as_early_as_its_constraints_allow() {
	let order = sorted(&[package("A").load_after("D"), package("B"), package("C"), package("D")]);
	assert_eq!(order, ids(&["B", "C", "D", "A"]));
}

#[test]
fn alphabetical_tie_break() {
	let catalog = catalog_of(&[package("b"), package("C"), package("a").load_after("C")]).unwrap();
	let mut options = ResolveOptions::default();
	options.set_tie_break(TieBreak::Alphabetical);

	let report = ResolverBuilder::new(&catalog)
		.active_identifiers(["C", "b", "a"])
		.options(options)
		.build()
		.resolve();

	assert_eq!(report.order.unwrap(), ids(&["b", "C", "a"]));
}

#[test]
fn sorter_reports_stall_on_cyclic_graph() {
	init_logging();
	let mut graph = DependencyGraph::default();
	for p in ["A", "B", "C"] {
		graph.add_package(p.into(), PinState::None);
	}
	graph.add_order_edge(&"A".into(), &"B".into(), EdgeData::LoadAfter).unwrap();
	graph.add_order_edge(&"B".into(), &"A".into(), EdgeData::LoadAfter).unwrap();

	match sort(&graph, TieBreak::ReferenceOrder) {
		Err(CycleError::Stalled(stuck)) => assert_eq!(stuck, ids(&["A", "B"])),
		other => panic!("expected a stall, got {:?}", other),
	}
}

/// Random acyclic package lists.
///
/// Relations only point from lower to higher package numbers so there is never a cycle,
/// the active list is a shuffle of the packages.
fn acyclic_records() -> impl Strategy<Value = Vec<PackageRecord>> {
	(1usize..12).prop_flat_map(|n| (
		proptest::collection::vec(proptest::collection::vec(0u8..4, n), n),
		proptest::collection::vec(0u8..4, n),
		Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
	)).prop_map(|(relations, pins, reference)| {
		let name = |i: usize| format!("pkg{}", i);
		let mut records: Vec<PackageRecord> = (0..pins.len()).map(|i| package(&name(i))).collect();
		for (i, row) in relations.iter().enumerate() {
			for (j, relation) in row.iter().enumerate().skip(i + 1) {
				records[j] = match relation {
					0 => records[j].clone().load_after(name(i)),
					1 => records[j].clone().depends_on(name(i)),
					_ => records[j].clone(),
				};
				if *relation == 2 {
					records[i] = records[i].clone().load_before(name(j));
				}
			}
		}
		for (record, pin) in records.iter_mut().zip(&pins) {
			record.pin = match pin {
				0 => PinState::ForceTop,
				1 => PinState::ForceBottom,
				_ => PinState::None,
			};
		}
		reference.into_iter().map(|i| records[i].clone()).collect()
	})
}

proptest! {
	#[test]
	fn every_edge_is_satisfied(records in acyclic_records()) {
		let catalog = catalog_of(&records).unwrap();
		let resolver = ResolverBuilder::new(&catalog).active_packages(records.clone()).build();
		let order = resolver.resolve().order.expect("acyclic");
		prop_assert_eq!(order.len(), records.len());

		for (before, after, _) in resolver.graph().graph.order_edges() {
			let (b, a) = (position_of(&order, before.as_str()), position_of(&order, after.as_str()));
			prop_assert!(b < a, "{} must precede {} in {:?}", before, after, order);
		}
	}

	#[test]
	fn sorting_is_idempotent(records in acyclic_records()) {
		let first = resolve_records(&records, &[], ResolveOptions::default()).unwrap().order.expect("acyclic");

		let reordered: Vec<PackageRecord> = first.iter()
			.filter_map(|id| records.iter().find(|r| &r.identifier == id).cloned())
			.collect();
		let second = resolve_records(&reordered, &[], ResolveOptions::default()).unwrap().order.expect("acyclic");

		prop_assert_eq!(first, second);
	}

	#[test]
	fn pins_hold(records in acyclic_records()) {
		let order = resolve_records(&records, &[], ResolveOptions::default()).unwrap().order.expect("acyclic");
		let pin_of = |id: &PackageId| records.iter().find(|r| &r.identifier == id).map(|r| r.pin).unwrap_or_default();
		let tier = |pin: PinState| match pin {
			PinState::ForceTop => 0,
			PinState::None => 1,
			PinState::ForceBottom => 2,
		};

		for pair in order.windows(2) {
			prop_assert!(tier(pin_of(&pair[0])) <= tier(pin_of(&pair[1])), "{} placed before {}", pair[0], pair[1]);
		}

		for pin in [PinState::ForceTop, PinState::ForceBottom] {
			let in_order: Vec<&PackageId> = order.iter().filter(|id| pin_of(*id) == pin).collect();
			let in_reference: Vec<&PackageId> = records.iter().filter(|r| r.pin == pin).map(|r| &r.identifier).collect();
			prop_assert_eq!(in_order, in_reference);
		}
	}
}
