use super::gates::not;
use super::sr_latch::sr_latch;
use crate::graph::*;

/// Returns a gated D latch module: while `en` is high `q` follows `d`, while it is low `q`
/// holds. Built from a [not] instance, 2 NANDs and an [sr_latch] instance.
///
/// Inputs are `d` then `en`, outputs are `q` then `nq`.
pub fn d_latch() -> Module {
    let mut c = Circuit::new("d_latch");
    let d = c.input("d");
    let en = c.input("en");

    let nd = c.instancex(&not(), &[d.clone()], "not");
    let s = c.nand2(&d, &en, "nand_s");
    let r = c.nand2(&nd[0], &en, "nand_r");
    let q = c.instancex(&sr_latch(), &[s, r], "sr");

    c.output(&q[0], "q");
    c.output(&q[1], "nq");
    Module::from_circuit("mod-d-latch", "D LATCH", c)
}
