// User-id checkpoints — numeric id upper bounds mapped to the month ids in
// that range were being handed out.
//
// Ids are assigned sequentially, so the table is sorted by `below` and a
// lower id means an older account.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Exclusive upper bound of the id range.
    pub below: u64,
    pub year: i32,
    pub month: u32,
}

const fn cp(below: u64, year: i32, month: u32) -> Checkpoint {
    Checkpoint { below, year, month }
}

pub const CHECKPOINTS: &[Checkpoint] = &[
    cp(1_000_000, 2010, 12),
    cp(5_000_000, 2011, 5),
    cp(15_000_000, 2011, 12),
    cp(35_000_000, 2012, 5),
    cp(75_000_000, 2012, 10),
    cp(200_000_000, 2013, 6),
    cp(500_000_000, 2013, 12),
    cp(1_000_000_000, 2014, 6),
    cp(1_500_000_000, 2015, 3),
    cp(2_000_000_000, 2015, 9),
    cp(3_000_000_000, 2016, 5),
    cp(4_000_000_000, 2016, 11),
    cp(5_000_000_000, 2017, 6),
    cp(6_000_000_000, 2017, 11),
    cp(8_000_000_000, 2018, 6),
    cp(10_000_000_000, 2018, 11),
    cp(20_000_000_000, 2019, 7),
    cp(30_000_000_000, 2019, 12),
    cp(40_000_000_000, 2020, 6),
    cp(45_000_000_000, 2020, 12),
    cp(50_000_000_000, 2021, 6),
    cp(55_000_000_000, 2021, 12),
    cp(60_000_000_000, 2022, 6),
    cp(65_000_000_000, 2023, 1),
    cp(70_000_000_000, 2023, 9),
];

/// Where a user id falls in the checkpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Under a known bound.
    Within(Checkpoint),
    /// Past every bound: newer than the last checkpoint.
    BeyondTable,
}

/// Find the first checkpoint whose bound the id is under.
pub fn lookup(user_id: u64) -> Option<Lookup> {
    let idx = CHECKPOINTS.partition_point(|c| c.below <= user_id);
    match CHECKPOINTS.get(idx) {
        Some(cp) => Some(Lookup::Within(*cp)),
        None => Some(Lookup::BeyondTable),
    }
}
