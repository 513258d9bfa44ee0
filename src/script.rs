use std::{
    cell::RefCell,
    collections::HashMap,
    io::{BufRead, Write},
    rc::Rc,
};

use itertools::Itertools;

use crate::{
    debug,
    element::HeapElement,
    errors::{PQueueError, as_io_error},
    heap::PQueue,
    options::CommonOptions,
};

/// A named unit of work, queued by priority.
#[derive(Debug)]
pub struct Task {
    pub name: String,
    pub priority: i64,
    position: usize,
}

impl Task {
    pub fn new(name: &str, priority: i64) -> Task {
        Task {
            name: String::from(name),
            priority,
            position: 0,
        }
    }
}

impl HeapElement for Task {
    type Priority = i64;

    fn priority(&self) -> i64 {
        self.priority
    }

    fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

type TaskRef = Rc<RefCell<Task>>;

fn write_task<W: Write>(out: &mut W, task: &TaskRef) -> std::io::Result<()> {
    let task = task.borrow();
    writeln!(out, "{} [{}]", task.priority, task.name)
}

/// Replays queue commands, one per line, against a queue of named tasks.
///
/// ```text
/// insert NAME PRIORITY
/// change NAME PRIORITY
/// remove NAME
/// peek | pop | size | check | print | dump
/// ```
///
/// Blank lines and lines starting with `#` are ignored.
pub struct Session<'a, W: Write> {
    queue: PQueue<TaskRef>,
    tasks: HashMap<String, TaskRef>,
    options: &'a CommonOptions,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(out: W, options: &'a CommonOptions) -> std::io::Result<Session<'a, W>> {
        let queue = PQueue::init(options.capacity).map_err(as_io_error)?;
        Ok(Session {
            queue,
            tasks: HashMap::new(),
            options,
            out,
        })
    }

    pub fn queue(&self) -> &PQueue<TaskRef> {
        &self.queue
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn run<R: BufRead>(&mut self, reader: R) -> std::io::Result<()> {
        log::info!("replaying commands");
        let mut n = 0;
        for (ix, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.step(ix + 1, line).map_err(as_io_error)?;
            n += 1;
        }
        log::info!("replayed {} commands, {} left queued", n, self.queue.size());
        Ok(())
    }

    fn step(&mut self, line_no: usize, line: &str) -> Result<(), PQueueError> {
        let mut words = line.split_whitespace();
        let cmd = words.next().unwrap_or_default();
        let mutated = match cmd {
            "insert" => {
                let name = next_word(&mut words, line_no, "name")?;
                let priority = next_priority(&mut words, line_no)?;
                no_more(&mut words, line_no)?;
                if self.tasks.contains_key(name) {
                    return Err(PQueueError::DuplicateName(line_no, String::from(name)));
                }
                let task = Rc::new(RefCell::new(Task::new(name, priority)));
                self.queue.insert(task.clone())?;
                self.tasks.insert(String::from(name), task);
                true
            }
            "change" => {
                let name = next_word(&mut words, line_no, "name")?;
                let priority = next_priority(&mut words, line_no)?;
                no_more(&mut words, line_no)?;
                let task = self.lookup(line_no, name)?;
                self.queue.change_priority(priority, &task)?;
                true
            }
            "remove" => {
                let name = next_word(&mut words, line_no, "name")?;
                no_more(&mut words, line_no)?;
                let task = self.lookup(line_no, name)?;
                let task = self.queue.remove(&task)?;
                self.tasks.remove(name);
                write!(self.out, "remove: ")?;
                write_task(&mut self.out, &task)?;
                true
            }
            "pop" => {
                no_more(&mut words, line_no)?;
                match self.queue.pop() {
                    Some(task) => {
                        self.tasks.remove(&task.borrow().name);
                        write!(self.out, "pop: ")?;
                        write_task(&mut self.out, &task)?;
                    }
                    None => {
                        log::warn!("pop from an empty queue at line {}", line_no);
                        writeln!(self.out, "pop: empty")?;
                    }
                }
                true
            }
            "peek" => {
                no_more(&mut words, line_no)?;
                match self.queue.peek() {
                    Some(task) => {
                        write!(self.out, "peek: ")?;
                        write_task(&mut self.out, task)?;
                    }
                    None => writeln!(self.out, "peek: empty")?,
                }
                false
            }
            "size" => {
                no_more(&mut words, line_no)?;
                writeln!(self.out, "size: {}", self.queue.size())?;
                false
            }
            "check" => {
                no_more(&mut words, line_no)?;
                let ok = self.queue.is_valid() && self.queue.positions_valid();
                writeln!(self.out, "check: {}", if ok { "ok" } else { "invalid" })?;
                false
            }
            "print" => {
                no_more(&mut words, line_no)?;
                debug::print(&self.queue, &mut self.out, write_task)?;
                false
            }
            "dump" => {
                no_more(&mut words, line_no)?;
                debug::dump(&self.queue, &mut self.out, write_task)?;
                false
            }
            _ => return Err(PQueueError::UnknownCommand(line_no, String::from(cmd))),
        };
        if mutated && self.options.check {
            self.verify(line_no)?;
        }
        Ok(())
    }

    fn verify(&self, line_no: usize) -> Result<(), PQueueError> {
        if !self.queue.is_valid() {
            return Err(PQueueError::Invariant(line_no, String::from("heap order")));
        }
        if !self.queue.positions_valid() {
            return Err(PQueueError::Invariant(line_no, String::from("element positions")));
        }
        Ok(())
    }

    fn lookup(&self, line_no: usize, name: &str) -> Result<TaskRef, PQueueError> {
        self.tasks
            .get(name)
            .cloned()
            .ok_or_else(|| PQueueError::UnknownName(line_no, String::from(name)))
    }
}

fn next_word<'b>(
    words: &mut impl Iterator<Item = &'b str>,
    line_no: usize,
    what: &str,
) -> Result<&'b str, PQueueError> {
    words
        .next()
        .ok_or_else(|| PQueueError::MissingArgument(line_no, String::from(what)))
}

fn next_priority<'b>(
    words: &mut impl Iterator<Item = &'b str>,
    line_no: usize,
) -> Result<i64, PQueueError> {
    let word = next_word(words, line_no, "priority")?;
    word.parse::<i64>()
        .map_err(|_| PQueueError::BadArgument(line_no, String::from(word)))
}

fn no_more<'b>(
    words: &mut impl Iterator<Item = &'b str>,
    line_no: usize,
) -> Result<(), PQueueError> {
    match words.next() {
        Some(extra) => Err(PQueueError::BadArgument(line_no, String::from(extra))),
        None => Ok(()),
    }
}

/// Replay a command script, writing results to `out`.
pub fn run_script<R: BufRead, W: Write>(
    reader: R,
    out: W,
    options: &CommonOptions,
) -> std::io::Result<()> {
    let mut session = Session::new(out, options)?;
    session.run(reader)?;
    session.into_inner().flush()
}

struct Ranked {
    value: i64,
    position: usize,
}

impl HeapElement for Ranked {
    type Priority = i64;

    fn priority(&self) -> i64 {
        self.value
    }

    fn set_priority(&mut self, priority: i64) {
        self.value = priority;
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

/// Read whitespace separated integers and write them back largest first.
pub fn sort_numbers<R: BufRead, W: Write>(
    reader: R,
    mut out: W,
    options: &CommonOptions,
) -> std::io::Result<()> {
    let mut cells: Vec<RefCell<Ranked>> = Vec::new();
    for (ix, line) in reader.lines().enumerate() {
        let line = line?;
        for word in line.split_whitespace() {
            let value = word
                .parse::<i64>()
                .map_err(|_| as_io_error(PQueueError::BadArgument(ix + 1, String::from(word))))?;
            cells.push(RefCell::new(Ranked { value, position: 0 }));
        }
    }
    log::info!("sorting {} values", cells.len());

    let mut queue = PQueue::init(options.capacity).map_err(as_io_error)?;
    for cell in cells.iter() {
        queue.insert(cell).map_err(as_io_error)?;
        if options.check {
            if !queue.is_valid() {
                let e = PQueueError::Invariant(queue.size(), String::from("heap order"));
                return Err(as_io_error(e));
            }
            if !queue.positions_valid() {
                let e = PQueueError::Invariant(queue.size(), String::from("element positions"));
                return Err(as_io_error(e));
            }
        }
    }

    let mut sorted = Vec::with_capacity(queue.size());
    while let Some(cell) = queue.pop() {
        sorted.push(cell.borrow().value);
    }
    writeln!(out, "{}", sorted.iter().join(" "))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn replay(script: &str, options: &CommonOptions) -> std::io::Result<String> {
        let mut out = Vec::new();
        run_script(Cursor::new(script), &mut out, options)?;
        Ok(String::from_utf8(out).unwrap())
    }

    const SAMPLE: &str = "
        # the classic five
        insert a 5
        insert b 4
        insert c 2
        insert d 6
        insert e 1
        peek
        change e 8
        change c 7
        size
        pop
        pop
        pop
        pop
        pop
        pop
        size
    ";

    #[test]
    fn sample_script() {
        let options = CommonOptions {
            capacity: 2,
            check: true,
        };
        let text = replay(SAMPLE, &options).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "peek: 6 [d]",
                "size: 5",
                "pop: 8 [e]",
                "pop: 7 [c]",
                "pop: 6 [d]",
                "pop: 5 [a]",
                "pop: 4 [b]",
                "pop: empty",
                "size: 0",
            ]
        );
    }

    #[test]
    fn remove_and_print() {
        let script = "insert x 3\ninsert y 9\ninsert z 5\nremove y\nprint\ncheck\n";
        let text = replay(script, &CommonOptions::default()).unwrap();
        assert_eq!(text, "remove: 9 [y]\n5 [z]\n3 [x]\ncheck: ok\n");
    }

    #[test]
    fn popped_tasks_are_forgotten() {
        let script = "insert x 3\npop\nremove x\n";
        let err = replay(script, &CommonOptions::default()).unwrap_err();
        assert!(err.to_string().contains("No queued element named 'x' (line 3)"));

        let script = "insert x 3\npop\ninsert x 4\npeek\n";
        let text = replay(script, &CommonOptions::default()).unwrap();
        assert_eq!(text, "pop: 3 [x]\npeek: 4 [x]\n");
    }

    #[test]
    fn script_errors() {
        let options = CommonOptions::default();
        let err = replay("frobnicate\n", &options).unwrap_err();
        assert!(err.to_string().contains("Unknown command 'frobnicate' at line 1"));

        let err = replay("insert a\n", &options).unwrap_err();
        assert!(err.to_string().contains("Missing priority at line 1"));

        let err = replay("insert a high\n", &options).unwrap_err();
        assert!(err.to_string().contains("Bad argument 'high' at line 1"));

        let err = replay("insert a 1\ninsert a 2\n", &options).unwrap_err();
        assert!(err.to_string().contains("already queued"));

        let err = replay("size 3\n", &options).unwrap_err();
        assert!(err.to_string().contains("Bad argument '3'"));
    }

    #[test]
    fn dump_script() {
        let text = replay("insert a 1\ninsert b 2\ndump\n", &CommonOptions::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1\t2\t3\t0\t2\t2 [b]");
        assert_eq!(lines[2], "2\t4\t5\t1\t0\t1 [a]");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_errors_pass_through() {
        let options = CommonOptions::default();
        let err = run_script(Cursor::new("insert a 1
peek
"), BrokenPipe, &options).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "closed");
    }

    #[test]
    fn sort_input() {
        let mut out = Vec::new();
        let options = CommonOptions {
            capacity: 1,
            check: true,
        };
        sort_numbers(Cursor::new("3 -1 10\n\n7 7\n"), &mut out, &options).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "10 7 7 3 -1\n");

        let mut out = Vec::new();
        let err = sort_numbers(Cursor::new("1 2\nthree\n"), &mut out, &options).unwrap_err();
        assert!(err.to_string().contains("Bad argument 'three' at line 2"));
    }
}
