//! Replica Synchronization Example
//!
//! Two offices edit the same network topology while disconnected, then
//! exchange state and converge.

use lwwgraph::prelude::*;

fn print_topology(name: &str, graph: &Graph) {
    println!("{name}:");
    for edge in graph.current_edges() {
        println!("  {}", edge);
    }
}

fn main() -> Result<(), CRDTError> {
    // Shared starting point
    let mut base = Graph::new();
    base.add_edge(Edge::new("gateway", "core", 1000));
    base.add_edge(Edge::new("core", "db", 1000));
    base.add_edge(Edge::new("core", "cache", 1000));

    let mut berlin = base.clone();
    let mut lisbon = base.clone();

    // Berlin retires the cache link and wires a replica database
    berlin.remove_edge(Edge::new("cache", "core", 1005));
    berlin.add_edge(Edge::new("db", "db-replica", 1006));

    // Lisbon re-adds the cache link at the same instant and adds an edge proxy
    lisbon.add_edge(Edge::new("core", "cache", 1005));
    lisbon.add_edge(Edge::new("edge-proxy", "gateway", 1007));

    print_topology("berlin", &berlin);
    print_topology("lisbon", &lisbon);

    // Ship only what the other side lacks
    if let Some(delta) = berlin.delta_since(&lisbon) {
        println!("berlin -> lisbon delta: {} bytes", Graph::delta_size(&delta));
        lisbon.apply_delta(&delta)?;
    }
    CRDT::merge(&mut berlin, &lisbon)?;

    assert!(berlin.eq(&lisbon));
    berlin.validate()?;
    print_topology("converged", &berlin);

    // Equal timestamps favour the add, so the cache link survives
    println!(
        "core-cache present: {}",
        berlin.check_in_graph(&Edge::new("core", "cache", 0))
    );

    let path = berlin.find_path(&Vertex::new("edge-proxy"), &Vertex::new("db-replica"));
    let hops: Vec<&str> = path.iter().map(Vertex::id).collect();
    println!("edge-proxy to db-replica: {}", hops.join(" -> "));

    Ok(())
}
