// Example: diffing keyed rows and replaying the script.
use virtualizr::{CollectionDiffer, EditKind};

#[derive(Clone, Debug, PartialEq)]
struct Row {
    id: u64,
    title: &'static str,
}

fn main() {
    let differ = CollectionDiffer::keyed(|row: &Row| row.id);

    let before = vec![
        Row { id: 1, title: "alpha" },
        Row { id: 2, title: "beta" },
        Row { id: 3, title: "gamma" },
        Row { id: 4, title: "delta" },
    ];
    let after = vec![
        Row { id: 4, title: "delta" },
        Row { id: 1, title: "alpha" },
        Row { id: 5, title: "epsilon" },
        Row { id: 3, title: "GAMMA" },
    ];

    let script = differ.diff(&before, &after);
    for op in &script {
        println!("{op:?}");
    }
    println!(
        "moves={} updates={} len_delta={}",
        script.count(EditKind::Move),
        script.count(EditKind::IdentityUpdate),
        script.len_delta()
    );
    println!("row 0 now at {:?}", script.remap_index(0));

    let mut replay = before.clone();
    script.apply_to(&mut replay).expect("script fits its own input");
    assert_eq!(replay, after);
}
