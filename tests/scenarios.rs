use memsched::{
    config::{Config, SchedulingPolicy},
    input::parse_processes,
    kernel::Kernel,
    paging::MemoryPolicy,
    stats::Summary,
};

fn simulate(config: Config, input: &str) -> (Vec<String>, Summary) {
    let processes = parse_processes(input).unwrap();
    let kernel = Kernel::new(&config, processes).unwrap();
    let mut lines = Vec::new();
    let summary = kernel.run(|event| lines.push(event.to_string()));
    (lines, summary)
}

#[test]
fn fcfs_unlimited_memory() {
    let config = Config::new(SchedulingPolicy::Fcfs, MemoryPolicy::Unlimited);
    let (lines, summary) = simulate(config, "0 1 0 5\n1 2 0 3\n");

    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=5",
            "5, FINISHED, id=1, proc-remaining=1",
            "5, RUNNING, id=2, remaining-time=3",
            "8, FINISHED, id=2, proc-remaining=0",
        ]
    );
    assert_eq!(summary.turnaround, 6);
    assert_eq!(summary.makespan, 8);
    assert_eq!(
        summary.to_string(),
        "Throughput 2, 2, 2\nTurnaround time 6\nTime overhead 2.33 1.67\nMakespan 8\n"
    );
}

#[test]
fn arrivals_read_out_of_order() {
    let config = Config::new(SchedulingPolicy::Fcfs, MemoryPolicy::Unlimited);
    let (lines, _) = simulate(config, "1 2 0 3\n0 1 0 5\n");
    assert_eq!(lines[0], "0, RUNNING, id=1, remaining-time=5");
}

#[test]
fn idle_gap_between_processes() {
    let config = Config::new(SchedulingPolicy::Fcfs, MemoryPolicy::Unlimited);
    let (lines, summary) = simulate(config, "0 1 0 2\n10 2 0 1\n");
    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=2",
            "2, FINISHED, id=1, proc-remaining=0",
            "10, RUNNING, id=2, remaining-time=1",
            "11, FINISHED, id=2, proc-remaining=0",
        ]
    );
    assert_eq!(summary.makespan, 11);
}

#[test]
fn fcfs_swap_frees_memory_on_finish() {
    let config = Config::new(SchedulingPolicy::Fcfs, MemoryPolicy::Swap).with_memory_size(16);
    let (lines, summary) = simulate(config, "0 1 16 3\n1 2 16 2\n");

    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=3, load-time=8, mem-usage=100%, mem-addresses=[0,1,2,3]",
            "11, EVICTED, mem-addresses=[0,1,2,3]",
            "11, FINISHED, id=1, proc-remaining=1",
            "11, RUNNING, id=2, remaining-time=2, load-time=8, mem-usage=100%, mem-addresses=[0,1,2,3]",
            "21, EVICTED, mem-addresses=[0,1,2,3]",
            "21, FINISHED, id=2, proc-remaining=0",
        ]
    );
    assert_eq!(summary.makespan, 21);
}

#[test]
fn round_robin_swap_evicts_before_running() {
    let config = Config::new(SchedulingPolicy::RoundRobin, MemoryPolicy::Swap)
        .with_memory_size(16)
        .with_quantum(2);
    let (lines, summary) = simulate(config, "0 1 16 5\n1 2 16 2\n");

    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=5, load-time=8, mem-usage=100%, mem-addresses=[0,1,2,3]",
            "10, EVICTED, mem-addresses=[0,1,2,3]",
            "10, RUNNING, id=2, remaining-time=2, load-time=8, mem-usage=100%, mem-addresses=[0,1,2,3]",
            "20, EVICTED, mem-addresses=[0,1,2,3]",
            "20, FINISHED, id=2, proc-remaining=1",
            "20, RUNNING, id=1, remaining-time=3, load-time=8, mem-usage=100%, mem-addresses=[0,1,2,3]",
            "31, EVICTED, mem-addresses=[0,1,2,3]",
            "31, FINISHED, id=1, proc-remaining=0",
        ]
    );
    assert_eq!(summary.memory.evicted_frames, 4);
}

#[test]
fn round_robin_cycles_in_order() {
    let config = Config::new(SchedulingPolicy::RoundRobin, MemoryPolicy::Unlimited).with_quantum(2);
    let (lines, _) = simulate(config, "0 1 0 5\n0 2 0 1\n0 3 0 4\n");

    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=5",
            "2, RUNNING, id=2, remaining-time=1",
            // Pid 2 needs less than a quantum and finishes without rotating.
            "3, FINISHED, id=2, proc-remaining=2",
            "3, RUNNING, id=3, remaining-time=4",
            "5, RUNNING, id=1, remaining-time=3",
            "7, RUNNING, id=3, remaining-time=2",
            "9, FINISHED, id=3, proc-remaining=1",
            "9, RUNNING, id=1, remaining-time=1",
            "10, FINISHED, id=1, proc-remaining=0",
        ]
    );
}

#[test]
fn round_robin_lone_process_keeps_cpu() {
    let config = Config::new(SchedulingPolicy::RoundRobin, MemoryPolicy::Unlimited).with_quantum(1);
    let (lines, _) = simulate(config, "0 1 0 3\n");
    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=3",
            "3, FINISHED, id=1, proc-remaining=0",
        ]
    );
}

#[test]
fn round_robin_quantum_excludes_load_time() {
    let config = Config::new(SchedulingPolicy::RoundRobin, MemoryPolicy::Virtual)
        .with_memory_size(64)
        .with_quantum(3);
    let (lines, _) = simulate(config, "0 1 8 5\n0 2 8 1\n");

    // Two pages take 4 seconds to load, then 3 seconds of CPU.
    assert_eq!(
        lines[0],
        "0, RUNNING, id=1, remaining-time=5, load-time=4, mem-usage=13%, mem-addresses=[0,1]"
    );
    assert_eq!(
        lines[1],
        "7, RUNNING, id=2, remaining-time=1, load-time=4, mem-usage=25%, mem-addresses=[2,3]"
    );
}

#[test]
fn virtual_memory_runs_with_minimum_resident_set() {
    let config = Config::new(SchedulingPolicy::Fcfs, MemoryPolicy::Virtual).with_memory_size(32);
    let (lines, summary) = simulate(config, "0 1 16 2\n0 2 32 1\n");

    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=2, load-time=8, mem-usage=50%, mem-addresses=[0,1,2,3]",
            "10, EVICTED, mem-addresses=[0,1,2,3]",
            "10, FINISHED, id=1, proc-remaining=1",
            "10, RUNNING, id=2, remaining-time=1, load-time=16, mem-usage=100%, mem-addresses=[0,1,2,3,4,5,6,7]",
            "27, EVICTED, mem-addresses=[0,1,2,3,4,5,6,7]",
            "27, FINISHED, id=2, proc-remaining=0",
        ]
    );
    assert_eq!(summary.memory.page_faults, 0);
}

#[test]
fn virtual_memory_partial_load_counts_fault() {
    let config = Config::new(SchedulingPolicy::RoundRobin, MemoryPolicy::Virtual)
        .with_memory_size(32)
        .with_quantum(1);
    let (lines, summary) = simulate(config, "0 1 16 3\n0 2 32 1\n");

    // Pid 2 only finds four free frames but that is its minimum set.
    assert_eq!(
        lines[1],
        "9, RUNNING, id=2, remaining-time=1, load-time=8, mem-usage=100%, mem-addresses=[4,5,6,7]"
    );
    assert_eq!(summary.memory.page_faults, 1);
}

#[test]
fn second_chance_skips_running_process() {
    let config = Config::new(SchedulingPolicy::RoundRobin, MemoryPolicy::SecondChance)
        .with_memory_size(24)
        .with_quantum(1);
    let (lines, _) = simulate(config, "0 1 16 4\n0 2 16 1\n");

    assert_eq!(
        lines[0],
        "0, RUNNING, id=1, remaining-time=4, load-time=8, mem-usage=67%, mem-addresses=[0,1,2,3]"
    );
    // Pid 2 takes the two free frames, then reclaims two of pid 1's.
    assert_eq!(lines[1], "9, EVICTED, mem-addresses=[0,1]");
    assert_eq!(
        lines[2],
        "9, RUNNING, id=2, remaining-time=1, load-time=8, mem-usage=100%, mem-addresses=[0,1,4,5]"
    );
}

#[test]
fn shortest_job_after_completion() {
    let config = Config::new(SchedulingPolicy::ShortestJob, MemoryPolicy::Unlimited);
    let (lines, summary) = simulate(config, "0 1 0 4\n1 2 0 6\n2 3 0 2\n");

    assert_eq!(
        lines,
        vec![
            "0, RUNNING, id=1, remaining-time=4",
            "4, FINISHED, id=1, proc-remaining=2",
            "4, RUNNING, id=3, remaining-time=2",
            "6, FINISHED, id=3, proc-remaining=1",
            "6, RUNNING, id=2, remaining-time=6",
            "12, FINISHED, id=2, proc-remaining=0",
        ]
    );
    assert_eq!(summary.turnaround, 7);
}
