diesel::table! {
    activities (id) {
        id -> BigInt,
        steps -> BigInt,
        date -> BigInt,
    }
}
