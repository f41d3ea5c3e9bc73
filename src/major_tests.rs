use crate::*;
use rand::{rngs::StdRng, SeedableRng};

const XOR_TABLE: [([f32; 2], f32); 4] = [
    ([0., 0.], 0.),
    ([0., 1.], 1.),
    ([1., 0.], 1.),
    ([1., 1.], 0.),
];

/// Inputs 1 and 2, bias node 3, AND neuron 4, OR neuron 5, output 6.
fn xor_skeleton(key: GenomeKey, bias_node_bias: f32) -> Genome {
    let mut genome = Genome::new(key);

    genome.add_node(NodeGene::new(1, NodeType::Input));
    genome.add_node(NodeGene::new(2, NodeType::Input));
    genome.add_node(NodeGene::new(3, NodeType::Bias).with_bias(bias_node_bias));
    genome.add_node(NodeGene::new(4, NodeType::Hidden));
    genome.add_node(NodeGene::new(5, NodeType::Hidden));
    genome.add_node(NodeGene::new(6, NodeType::Output));

    genome
}

fn add_connections(genome: &mut Genome, weights: [f32; 9]) {
    let edges = [
        (7, 1, 4),
        (8, 2, 4),
        (9, 3, 4),
        (10, 1, 5),
        (11, 2, 5),
        (12, 3, 5),
        (13, 5, 6),
        (14, 4, 6),
        (15, 3, 6),
    ];

    for ((key, from, to), w) in edges.into_iter().zip(weights) {
        genome.add_connection(ConnectionGene::new(key, from, to, w));
    }
}

/// The bias node's value is `tanh(bias)`, so a large bias makes it emit roughly 1.
fn xor_genome() -> Genome {
    let mut genome = xor_skeleton(1, 10.);
    add_connections(&mut genome, [10., 10., -15., 10., 10., -5., 4., -4., 0.]);
    genome
}

#[test]
fn xor() {
    let mut net = NeuralNetwork::new(&xor_genome()).unwrap();

    for (inputs, expected) in XOR_TABLE {
        let out = net.activate(&inputs).unwrap();
        assert_eq!(out.len(), 1);
        assert!(
            (out[0] - expected).abs() < 0.1,
            "{inputs:?} -> {out:?}, expected {expected}"
        );
    }

    let mut tester = NetworkTester::new(net);
    let cases = XOR_TABLE.map(|(i, e)| (i, [e]));
    let avg = tester
        .test_all(cases.iter().map(|(i, e)| (&i[..], &e[..])))
        .unwrap();

    assert_eq!(tester.test_count(), 4);
    assert!(avg < 0.01, "average mse {avg}");
}

#[test]
fn unbiased_hand_built_xor_follows_tanh_rule() {
    // with a zero-bias bias node, every threshold edge contributes nothing.
    let mut genome = xor_skeleton(1, 0.);
    add_connections(&mut genome, [4., 4., -6., 4., 4., -2., 4., -8., 0.]);

    let mut net = NeuralNetwork::new(&genome).unwrap();

    for (inputs, _) in XOR_TABLE {
        let out = net.activate(&inputs).unwrap();

        let hidden = (4. * inputs[0] + 4. * inputs[1]).tanh();
        let expected = (4. * hidden - 8. * hidden).tanh();

        assert!((out[0] - expected).abs() < 1e-5, "{inputs:?} -> {out:?}");
        assert_eq!(net.node_values()[&3], 0.);
    }
}

#[test]
fn or_network() {
    let mut genome = Genome::new(2);
    genome.add_node(NodeGene::new(1, NodeType::Input));
    genome.add_node(NodeGene::new(2, NodeType::Input));
    genome.add_node(NodeGene::new(3, NodeType::Bias).with_bias(10.));
    genome.add_node(NodeGene::new(4, NodeType::Output));
    genome.add_connection(ConnectionGene::new(5, 1, 4, 5.));
    genome.add_connection(ConnectionGene::new(6, 2, 4, 5.));
    genome.add_connection(ConnectionGene::new(7, 3, 4, -2.5));

    let mut tester = NetworkTester::new(NeuralNetwork::new(&genome).unwrap());

    let zero = tester.test(&[0., 0.], &[0.]).unwrap();
    for inputs in [[0., 1.], [1., 0.], [1., 1.]] {
        assert!(tester.test(&inputs, &[1.]).unwrap() < 0.01);
    }

    // tanh(-2.5) undershoots to about -0.99.
    assert!(zero > 0.9);
    assert_eq!(tester.test_count(), 4);
    tester.report();
}

#[test]
fn crossover_of_xor_variants() {
    let mut a = xor_genome();
    a.fitness = Some(4.);

    let mut b = a.clone_with_key(2);
    b.fitness = Some(1.);
    b.add_node(NodeGene::new(16, NodeType::Hidden));
    b.add_connection(ConnectionGene::new(17, 1, 16, 1.));
    b.add_connection(ConnectionGene::new(18, 16, 6, 1.));
    b.connections.for_each_mut(|c| c.weight *= -1.);

    let settings = CompatibilitySettings::default();
    // one extra node, two extra connections, and every matching weight flipped.
    let expected_distance = 3. + 0.5 * (2. * (10. + 10. + 15. + 10. + 10. + 5. + 4. + 4.) / 9.);
    assert!((a.compatibility(&b, &settings) - expected_distance).abs() < 1e-4);

    let mut rng = StdRng::seed_from_u64(0xabcdef);
    for child_key in 3..20 {
        let (child, trace) = b.crossover_traced(&a, child_key, &mut rng);

        assert_eq!(child.nodes.len(), 6);
        assert_eq!(child.connections.len(), 9);
        assert_eq!(trace.connection_choices().count(), 9);

        let mut net = NeuralNetwork::new(&child).unwrap();
        let out = net.activate(&[1., 0.]).unwrap();
        assert!(out[0].abs() <= 1.);
    }

    // the fitter parent is unchanged by crossover, so its compiled network still solves xor.
    let net = NeuralNetwork::new(&a).unwrap();
    assert!(net.predict(&[1., 0.]).unwrap()[0] > 0.9);
}
