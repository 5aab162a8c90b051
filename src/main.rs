// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Solves the default knight-swap puzzle and prints every solution found.

use knight_swap::{Board, traverse};

fn main() {
    let traversal = traverse(Board::default());
    let visited = traversal.visited().len();

    for board in traversal.solutions() {
        println!("*********************");
        println!(
            "In {} moves, visiting {visited} layouts (excluding the final one):",
            board.moves()
        );
        println!("{}", board.display_history());
        println!();
    }

    let stats = traversal.stats();
    println!(
        "{} solutions over {} layers: expanded {} boards, generated {}, pruned {} revisits, collapsed {}",
        traversal.solutions().len(),
        stats.layers,
        stats.expanded,
        stats.generated,
        stats.pruned,
        stats.collapsed
    );
}
