use super::generate::generate_truth_table_with_config;
use super::table::TruthTable;
use crate::error::{Result, SimError};
use crate::graph::{Circuit, ModuleLibrary};
use crate::simulation::SimulationConfig;
use indexmap::IndexMap;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Identifier correlating a [TruthTableRequest] with its [TruthTableResponse].
pub type RequestId = u64;

/// Everything needed to generate a table, owned so it can cross to the worker thread.
#[derive(Clone, Debug)]
pub struct TruthTableRequest {
    pub id: RequestId,
    pub circuit: Circuit,
    pub library: ModuleLibrary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TruthTableResponse {
    pub id: RequestId,
    pub table: Option<TruthTable>,
}

/// Generates truth tables on a background thread.
///
/// Requests are processed in order, one at a time. There is no cancellation: a caller that
/// is no longer interested in a response just ignores its id.
///
/// Dropping the worker never waits for it. Queued requests are discarded and the thread
/// exits once the table it is currently generating, if any, is done.
///
/// # Example
/// ```
/// # use nandsim::{Circuit, ModuleLibrary, TruthTableWorker};
/// let mut c = Circuit::new("not");
/// let a = c.input("a");
/// let n = c.nand2(&a, &a, "nand");
/// c.output(&n, "out");
///
/// let mut worker = TruthTableWorker::new();
/// let id = worker.request(c, ModuleLibrary::new()).unwrap();
/// let table = worker.wait(id).unwrap().unwrap();
/// assert_eq!(table.row("0").as_deref(), Some("1"));
/// ```
pub struct TruthTableWorker {
    tx: Sender<TruthTableRequest>,
    rx_result: Receiver<TruthTableResponse>,
    shutdown: Arc<AtomicBool>,
    next_id: RequestId,
    /// Responses received while waiting for a different id.
    early: IndexMap<RequestId, Option<TruthTable>>,
}

impl TruthTableWorker {
    /// Spawns a worker using the default [SimulationConfig].
    pub fn new() -> Self {
        Self::with_config(Default::default())
    }

    /// Spawns a worker using `config`.
    pub fn with_config(config: SimulationConfig) -> Self {
        let (tx, rx) = channel::<TruthTableRequest>();
        let (tx_result, rx_result) = channel::<TruthTableResponse>();
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);

        thread::spawn(move || {
            while let Ok(request) = rx.recv() {
                if stop.load(Ordering::Acquire) {
                    debug!("truth table worker stopped, {} discarded", request.id);
                    break;
                }
                debug!("generating truth table {} for {}", request.id, request.circuit.name);
                let table =
                    generate_truth_table_with_config(&request.circuit, &request.library, config);
                let response = TruthTableResponse {
                    id: request.id,
                    table,
                };
                if tx_result.send(response).is_err() {
                    break;
                }
            }
        });

        Self {
            tx,
            rx_result,
            shutdown,
            next_id: 0,
            early: IndexMap::new(),
        }
    }

    /// Queues a table generation for `circuit`, returns the id its response will carry.
    pub fn request(&mut self, circuit: Circuit, library: ModuleLibrary) -> Result<RequestId> {
        let id = self.next_id;
        self.next_id += 1;
        self.tx
            .send(TruthTableRequest {
                id,
                circuit,
                library,
            })
            .map_err(|_| SimError::WorkerDisconnected)?;
        Ok(id)
    }

    /// Returns the next response if one is ready, without blocking.
    pub fn try_recv(&mut self) -> Result<Option<TruthTableResponse>> {
        if let Some((id, table)) = self.early.shift_remove_index(0) {
            return Ok(Some(TruthTableResponse { id, table }));
        }
        match self.rx_result.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SimError::WorkerDisconnected),
        }
    }

    /// Blocks until the next response arrives.
    pub fn recv(&mut self) -> Result<TruthTableResponse> {
        if let Some((id, table)) = self.early.shift_remove_index(0) {
            return Ok(TruthTableResponse { id, table });
        }
        self.rx_result.recv().map_err(|_| SimError::WorkerDisconnected)
    }

    /// Blocks until the response to request `id` arrives and returns its table.
    /// Responses to other requests are kept for later [recv](TruthTableWorker::recv) calls.
    pub fn wait(&mut self, id: RequestId) -> Result<Option<TruthTable>> {
        if let Some(table) = self.early.shift_remove(&id) {
            return Ok(table);
        }
        loop {
            let response = self
                .rx_result
                .recv()
                .map_err(|_| SimError::WorkerDisconnected)?;
            if response.id == id {
                return Ok(response.table);
            }
            self.early.insert(response.id, response.table);
        }
    }
}

impl Default for TruthTableWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TruthTableWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{half_adder, sr_latch, standard_library};
    use std::time::{Duration, Instant};

    fn wide(n: usize) -> Circuit {
        let mut c = Circuit::new(format!("wide{}", n));
        let pins: Vec<_> = (0..n).map(|i| c.input(format!("i{}", i))).collect();
        let mut acc = pins[0].clone();
        for (i, pin) in pins.iter().enumerate().skip(1) {
            acc = c.nand2(&acc, pin, format!("n{}", i));
        }
        c.output(&acc, "out");
        c
    }

    #[test]
    fn test_out_of_order_wait() {
        let library = standard_library();
        let mut worker = TruthTableWorker::new();
        let adder = worker
            .request(half_adder().circuit, library.clone())
            .unwrap();
        let latch = worker.request(sr_latch().circuit, library).unwrap();
        assert_ne!(adder, latch);

        assert_eq!(worker.wait(latch).unwrap(), None);
        let response = worker.recv().unwrap();
        assert_eq!(response.id, adder);
        let table = response.table.unwrap();
        assert_eq!(table.row("11").as_deref(), Some("01"));
    }

    #[test]
    fn test_try_recv_eventually() {
        let mut worker = TruthTableWorker::new();
        assert_eq!(worker.try_recv().unwrap(), None);

        let id = worker
            .request(Circuit::new("empty"), ModuleLibrary::new())
            .unwrap();
        let response = loop {
            if let Some(response) = worker.try_recv().unwrap() {
                break response;
            }
            thread::yield_now();
        };
        assert_eq!(response.id, id);
        assert_eq!(response.table.map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_drop_does_not_wait() {
        let mut worker = TruthTableWorker::new();
        for _ in 0..3 {
            worker.request(wide(16), ModuleLibrary::new()).unwrap();
        }

        let start = Instant::now();
        drop(worker);
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
