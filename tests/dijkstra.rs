//! Demonstrates the `AddressableHeap` contract end to end: a textbook
//! Dijkstra shortest-path search built on `insert`/`decrease_key`/
//! `delete_min`, checked against every heap variant.

use heap_bench::queue::{AddressableHeap, Key};
use heap_bench::{DaryImplicitHeap, FibonacciHeap, Handle, PairingHeap, QuakeHeap, RankPairingHeap, ViolationHeap};

struct Edge {
    node: usize,
    cost: u32,
}

fn shortest_path<H: AddressableHeap>(heap: &mut H, adj_list: &[Vec<Edge>], start: usize, goal: usize) -> Option<Key> {
    let mut dist: Vec<Key> = vec![Key::MAX; adj_list.len()];
    let mut handle_of: Vec<Option<Handle>> = vec![None; adj_list.len()];

    dist[start] = 0;
    handle_of[start] = Some(heap.insert(start as u32, 0).unwrap());

    while let Some(min) = heap.find_min() {
        let position = heap.item_of(min) as usize;
        let cost = heap.key_of(min);
        heap.delete_min();

        if position == goal {
            return Some(cost);
        }
        if cost > dist[position] {
            continue;
        }

        for edge in &adj_list[position] {
            let next_cost = cost + edge.cost;
            if next_cost < dist[edge.node] {
                dist[edge.node] = next_cost;
                match handle_of[edge.node] {
                    Some(h) => heap.decrease_key(h, next_cost),
                    None => handle_of[edge.node] = Some(heap.insert(edge.node as u32, next_cost).unwrap()),
                }
            }
        }
    }

    None
}

// The graph is represented as an adjacency list where each index,
// corresponding to a node value, has a list of outgoing edges.
//
//                  7
//          +-----------------+
//          |                 |
//          v   1        2    |  2
//          0 -----> 1 -----> 3 ---> 4
//          |        ^        ^      ^
//          |        | 1      |      |
//          |        |        | 3    | 1
//          +------> 2 -------+      |
//           10      |               |
//                   +---------------+
fn graph() -> Vec<Vec<Edge>> {
    vec![
        vec![Edge { node: 2, cost: 10 }, Edge { node: 1, cost: 1 }],
        vec![Edge { node: 3, cost: 2 }],
        vec![
            Edge { node: 1, cost: 1 },
            Edge { node: 3, cost: 3 },
            Edge { node: 4, cost: 1 },
        ],
        vec![Edge { node: 0, cost: 7 }, Edge { node: 4, cost: 2 }],
        vec![],
    ]
}

fn check<H: AddressableHeap>(mut new_heap: impl FnMut() -> H) {
    let g = graph();
    assert_eq!(shortest_path(&mut new_heap(), &g, 0, 1), Some(1));
    assert_eq!(shortest_path(&mut new_heap(), &g, 0, 3), Some(3));
    assert_eq!(shortest_path(&mut new_heap(), &g, 3, 0), Some(7));
    assert_eq!(shortest_path(&mut new_heap(), &g, 0, 4), Some(5));
    assert_eq!(shortest_path(&mut new_heap(), &g, 4, 0), None);
}

#[test]
fn dijkstra_on_implicit_dary() {
    check(|| DaryImplicitHeap::<4>::with_capacity(16));
}

#[test]
fn dijkstra_on_pairing() {
    check(|| PairingHeap::with_capacity(16));
}

#[test]
fn dijkstra_on_fibonacci() {
    check(|| FibonacciHeap::with_capacity(16));
}

#[test]
fn dijkstra_on_rank_pairing() {
    check(|| RankPairingHeap::with_capacity(16));
}

#[test]
fn dijkstra_on_violation() {
    check(|| ViolationHeap::with_capacity(16));
}

#[test]
fn dijkstra_on_quake() {
    check(|| QuakeHeap::with_capacity(16));
}
