use strata_graph::{Error, Graph, alg};

fn three_roots() -> Graph {
    let mut g = Graph::new("arch");
    let a = g.add_node("A", "Cluster").unwrap();
    g.add_node("B", "Cluster").unwrap();
    g.add_node("C", "Component").unwrap();
    let a1 = g.add_node("A1", "Component").unwrap();
    g.add_child(a, a1).unwrap();
    g
}

#[test]
fn get_roots_returns_parentless_nodes_in_insertion_order() {
    let g = three_roots();
    let roots: Vec<&str> = g.roots().into_iter().map(|ix| g.node(ix).id()).collect();
    assert_eq!(roots, vec!["A", "B", "C"]);
}

#[test]
fn get_node_fails_with_not_found() {
    let g = three_roots();
    assert!(g.contains_node("A1"));
    assert!(!g.contains_node("Z"));
    assert!(matches!(g.get_node("Z"), Err(Error::NodeNotFound { .. })));
    assert_eq!(g.get_node("A1").unwrap().level(), 1);
}

#[test]
fn add_node_rejects_empty_and_duplicate_ids() {
    let mut g = three_roots();
    assert!(matches!(g.add_node("", "Cluster"), Err(Error::EmptyId { .. })));
    assert!(matches!(
        g.add_node("A", "Cluster"),
        Err(Error::DuplicateNode { .. })
    ));
}

#[test]
fn add_edge_fails_for_endpoints_in_different_graphs() {
    let mut g = three_roots();
    let mut other = Graph::new("arch");
    other.add_node("A", "Cluster").unwrap();

    let source = g.node_ref("A").unwrap();
    let target = other.node_ref("A").unwrap();
    let err = g.add_edge(source, target, Some("e"), "Dependency").unwrap_err();
    assert!(matches!(err, Error::CrossGraphReference { .. }));
    assert_eq!(g.edge_count(), 0);
    assert!(g.node(source.node).outgoings().is_empty());
}

#[test]
fn add_edge_rejects_handles_of_a_foreign_graph() {
    let mut g = three_roots();
    let mut other = Graph::new("other");
    other.add_node("x", "Cluster").unwrap();
    other.add_node("y", "Cluster").unwrap();
    let x = other.node_ref("x").unwrap();
    let y = other.node_ref("y").unwrap();
    assert!(matches!(
        g.add_edge(x, y, None, "Dependency"),
        Err(Error::ForeignNode { .. })
    ));
}

#[test]
fn edges_are_indexed_as_incoming_and_outgoing() {
    let mut g = three_roots();
    let a1 = g.node_ref("A1").unwrap();
    let c = g.node_ref("C").unwrap();
    let e = g.add_edge(a1, c, Some("dep"), "Dependency").unwrap();

    assert_eq!(g.node(a1.node).outgoings(), &[e]);
    assert_eq!(g.node(c.node).incomings(), &[e]);
    assert_eq!(g.get_edge("dep").unwrap().edge_type(), "Dependency");
    assert!(matches!(
        g.add_edge(a1, c, Some("dep"), "Dependency"),
        Err(Error::DuplicateEdge { .. })
    ));
}

#[test]
fn lca_and_ancestor_closure() {
    let mut g = Graph::new("g");
    let r = g.add_node("r", "Cluster").unwrap();
    let p = g.add_node("p", "Cluster").unwrap();
    let q = g.add_node("q", "Cluster").unwrap();
    let p1 = g.add_node("p1", "Component").unwrap();
    let q1 = g.add_node("q1", "Component").unwrap();
    let loner = g.add_node("loner", "Component").unwrap();
    g.add_child(r, p).unwrap();
    g.add_child(r, q).unwrap();
    g.add_child(p, p1).unwrap();
    g.add_child(q, q1).unwrap();

    assert_eq!(alg::lca(&g, p1, q1), Some(r));
    assert_eq!(alg::lca(&g, p1, p), Some(p));
    assert_eq!(alg::lca(&g, p1, loner), None);

    let closure = alg::ancestor_closure(&g, &[p1, q1]);
    assert_eq!(closure, vec![p1, p, r, q1, q]);

    assert_eq!(alg::descendants(&g, r), vec![r, p, p1, q, q1]);
    assert_eq!(alg::preorder(&g), vec![r, p, p1, q, q1, loner]);
}

#[test]
fn connecting_edges_stay_inside_the_node_set() {
    let mut g = Graph::new("g");
    let a = g.add_node("a", "Component").unwrap();
    let b = g.add_node("b", "Component").unwrap();
    let c = g.add_node("c", "Component").unwrap();
    let (ra, rb, rc) = (g.to_ref(a), g.to_ref(b), g.to_ref(c));
    let ab = g.add_edge(ra, rb, Some("ab"), "Call").unwrap();
    g.add_edge(rb, rc, Some("bc"), "Call").unwrap();
    let ba = g.add_edge(rb, ra, Some("ba"), "Call").unwrap();

    let members: rustc_hash::FxHashSet<_> = [a, b].into_iter().collect();
    assert_eq!(alg::connecting_edges(&g, &members), vec![ab, ba]);

    g.remove_edge(ab).unwrap();
    assert_eq!(alg::connecting_edges(&g, &members), vec![ba]);
}
