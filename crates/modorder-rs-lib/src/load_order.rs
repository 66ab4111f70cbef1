//! Computes a deterministic load order for a list of active packages.
//!
//! # Usage
//! 1. Create a [`ResolverBuilder`] from a [`Catalog`](crate::Catalog).
//! 1. Use the builder to add the active packages in their current order, rules from the community
//! and user databases and the [`ResolveOptions`](crate::ResolveOptions).
//! 1. [`ResolverBuilder::build()`] to get a [`LoadOrderResolver`].
//! 1. [`LoadOrderResolver::resolve()`] to get a [`ResolveReport`] containing either the new order or
//! the cycles preventing one, along with the unresolved dependency and incompatibility reports.
//!
//! # Process
//! 1. Rules for each active package are merged into a [`CanonicalConstraintSet`] by [`aggregate()`].
//! 1. [`build_graph()`] turns the constraints into a [`DependencyGraph`] of "must precede" edges.
//! 1. [`detect_cycles()`] checks the graph, a cyclic graph is never sorted.
//! 1. [`sort()`] places the packages.
//!
//! Each step is a plain function over immutable input so they can also be used on their own.
//! A resolve holds no shared state and can run on any thread.

mod dependency_graph;
pub use dependency_graph::DependencyGraph;
pub use dependency_graph::NodeData;
pub use dependency_graph::EdgeData;

mod aggregator;
pub use aggregator::aggregate;
pub use aggregator::CanonicalConstraintSet;
pub use aggregator::EffectiveDependency;
pub use aggregator::KnownPackages;

mod graph_builder;
pub use graph_builder::build_graph;
pub use graph_builder::GraphBuild;

mod cycle_detector;
pub use cycle_detector::detect_cycles;
pub use cycle_detector::Cycle;
pub use cycle_detector::CycleError;

mod sorter;
pub use sorter::sort;

mod report;
pub use report::ResolveReport;
pub use report::Diagnostic;
pub use report::UnresolvedDependency;
pub use report::Incompatibility;

mod resolver_builder;
pub use resolver_builder::ResolverBuilder;
mod resolver;
pub use resolver::LoadOrderResolver;
