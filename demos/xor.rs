use neat_genome::*;
use rand::{rngs::StdRng, SeedableRng};
use tracing::Level;

fn xor_genome() -> Genome {
    let mut genome = Genome::new(1);

    genome.add_node(NodeGene::new(1, NodeType::Input));
    genome.add_node(NodeGene::new(2, NodeType::Input));
    // tanh(10) is close enough to 1 for a constant source.
    genome.add_node(NodeGene::new(3, NodeType::Bias).with_bias(10.));
    genome.add_node(NodeGene::new(4, NodeType::Hidden));
    genome.add_node(NodeGene::new(5, NodeType::Hidden));
    genome.add_node(NodeGene::new(6, NodeType::Output));

    // AND
    genome.add_connection(ConnectionGene::new(7, 1, 4, 10.));
    genome.add_connection(ConnectionGene::new(8, 2, 4, 10.));
    genome.add_connection(ConnectionGene::new(9, 3, 4, -15.));

    // OR
    genome.add_connection(ConnectionGene::new(10, 1, 5, 10.));
    genome.add_connection(ConnectionGene::new(11, 2, 5, 10.));
    genome.add_connection(ConnectionGene::new(12, 3, 5, -5.));

    // OR - AND
    genome.add_connection(ConnectionGene::new(13, 5, 6, 4.));
    genome.add_connection(ConnectionGene::new(14, 4, 6, -4.));
    genome.add_connection(ConnectionGene::new(15, 3, 6, 0.));

    genome
}

fn or_genome() -> Genome {
    let mut genome = Genome::new(2);

    genome.add_node(NodeGene::new(1, NodeType::Input));
    genome.add_node(NodeGene::new(2, NodeType::Input));
    genome.add_node(NodeGene::new(3, NodeType::Bias).with_bias(10.));
    genome.add_node(NodeGene::new(4, NodeType::Output));

    genome.add_connection(ConnectionGene::new(5, 1, 4, 5.));
    genome.add_connection(ConnectionGene::new(6, 2, 4, 5.));
    genome.add_connection(ConnectionGene::new(7, 3, 4, -2.5));

    genome
}

fn run_table(genome: &Genome, table: &[([f32; 2], f32)]) -> Result<f32, NeatError> {
    let mut tester = NetworkTester::new(NeuralNetwork::new(genome)?);

    for (inputs, expected) in table {
        tester.test(inputs, &[*expected])?;
    }

    tester.report();
    Ok(tester.average_mse())
}

fn main() -> Result<(), NeatError> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let xor = xor_genome();
    println!("{xor}");

    let mse = run_table(
        &xor,
        &[([0., 0.], 0.), ([0., 1.], 1.), ([1., 0.], 1.), ([1., 1.], 0.)],
    )?;
    println!("XOR average MSE: {mse:.6}");

    let mse = run_table(
        &or_genome(),
        &[([0., 0.], 0.), ([0., 1.], 1.), ([1., 0.], 1.), ([1., 1.], 1.)],
    )?;
    println!("OR average MSE: {mse:.6}");

    let mut parent_a = xor;
    parent_a.fitness = Some(1. - mse);

    let mut parent_b = parent_a.clone_with_key(3);
    parent_b.fitness = Some(0.);
    parent_b.connections.for_each_mut(|c| c.weight *= 0.5);

    let settings = CompatibilitySettings::default();
    println!(
        "distance between parents: {:.4}",
        parent_a.compatibility(&parent_b, &settings)
    );

    let mut rng = StdRng::seed_from_u64(42);
    let (child, trace) = parent_a.crossover_traced(&parent_b, 4, &mut rng);

    print!("{trace}");
    println!("{child}");

    let mut net = NeuralNetwork::new(&child)?;
    let out = net.activate(&[1., 0.])?;
    println!("child [1, 0] -> {out:?}");

    let mut values: Vec<_> = net.node_values().iter().collect();
    values.sort_by_key(|(k, _)| **k);
    for (key, value) in values {
        println!("  node {key}: {value:.4}");
    }

    Ok(())
}
