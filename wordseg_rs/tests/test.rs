mod test_aho_corasick {
    use wordseg_rs::{AcTrie, DoubleArrayTrie, WordArena};

    fn build(patterns: &[&str]) -> (WordArena, AcTrie) {
        let mut arena = WordArena::new();
        let mut trie = AcTrie::new();
        for pattern in patterns {
            let word = arena.push(pattern.as_bytes());
            trie.add(word, &arena);
        }
        trie.finalize();
        (arena, trie)
    }

    fn trie_matches(patterns: &[&str], haystack: &str) -> Vec<(usize, usize)> {
        let (_arena, trie) = build(patterns);
        let mut matches = Vec::new();
        trie.scan(haystack.as_bytes(), None, |end, word| {
            matches.push((end - word.len(), word.len()));
        });
        matches
    }

    fn dat_matches(patterns: &[&str], haystack: &str) -> Vec<(usize, usize)> {
        let (arena, trie) = build(patterns);
        let dat = DoubleArrayTrie::build_from(&trie, &arena);
        let mut matches = Vec::new();
        dat.scan(haystack.as_bytes(), &arena, |end, word| {
            matches.push((end - word.len(), word.len()));
        });
        matches
    }

    const PATTERNS: &[&str] = &["i", "he", "his", "she", "hers"];
    const EXPECTED: &[(usize, usize)] = &[
        (1, 3),
        (2, 2),
        (2, 4),
        (5, 3),
        (6, 2),
        (8, 1),
        (11, 1),
        (10, 3),
    ];

    #[test]
    fn trie_scan() {
        assert_eq!(trie_matches(PATTERNS, "ushersheishis"), EXPECTED);
    }

    #[test]
    fn dat_scan() {
        assert_eq!(dat_matches(PATTERNS, "ushersheishis"), EXPECTED);
    }

    #[test]
    fn dat_scan_with_merged_chain() {
        // "abcdefg" has no suffix that is another pattern's prefix, so its
        // whole path collapses into one tail-compressed chain
        let patterns = &["i", "he", "his", "she", "hers", "abcdefg"];
        let haystack = "xxabcdefghis";

        let mut from_trie = trie_matches(patterns, haystack);
        let mut from_dat = dat_matches(patterns, haystack);
        from_trie.sort_unstable();
        from_dat.sort_unstable();

        assert!(from_dat.contains(&(2, 7)));
        assert!(from_dat.contains(&(9, 3)));
        assert_eq!(from_trie, from_dat);
    }

    #[test]
    fn dat_scan_fail_link_into_merged_chain() {
        // the fail link of "zabbb"'s terminal targets the interior of the
        // merged "abbb" chain; suffix matches must survive the elision
        let patterns = &["b", "abbb", "zabbb"];
        let haystack = "zabbb";

        let mut from_trie = trie_matches(patterns, haystack);
        let mut from_dat = dat_matches(patterns, haystack);
        from_trie.sort_unstable();
        from_dat.sort_unstable();

        assert_eq!(from_trie, from_dat);
        assert!(from_dat.contains(&(4, 1)));
    }

    #[test]
    fn dat_scan_no_partial_tail_hit() {
        // truncated haystack must not report the merged pattern
        let matches = dat_matches(&["abcdefgh"], "abcdefg");
        assert!(matches.is_empty());
    }

    #[test]
    fn chunked_scan_equals_contiguous() {
        let (_arena, trie) = build(PATTERNS);
        let haystack = "ushersheishis".as_bytes();

        let mut matches = Vec::new();
        let mut state = trie.initial_scan_state();
        let (head, tail) = haystack.split_at(6);
        trie.scan(head, Some(&mut state), |end, word| {
            matches.push((end - word.len(), word.len()));
        });
        trie.scan(tail, Some(&mut state), |end, word| {
            let end = end + 6;
            matches.push((end - word.len(), word.len()));
        });

        assert_eq!(matches, EXPECTED);
    }
}

mod test_word_dag {
    use wordseg_rs::{shortest_path, WordDag};

    #[test]
    fn kahn_shortest_path() {
        let mut dag = WordDag::new(b"012345");
        dag.add_edge(0, 2, 5.0);
        dag.add_edge(2, 5, 10.0);
        dag.add_edge(0, 1, 7.0);
        dag.add_edge(1, 5, 9.0);
        dag.add_edge(5, 6, 4.0);

        let result = shortest_path(&dag).unwrap();
        assert_eq!(result.path, [2, 5]);
        assert_eq!(result.score, 19.0);
    }

    #[test]
    fn duplicate_edge_keeps_minimum() {
        let mut dag = WordDag::new(b"0123");
        dag.add_edge(0, 2, 5.0);
        dag.add_edge(0, 2, 7.0);
        assert_eq!(dag.adjacents(0)[&2], 5.0);
        dag.add_edge(0, 2, 3.0);
        assert_eq!(dag.adjacents(0)[&2], 3.0);
        assert_eq!(dag.in_degree()[2], 1);
    }

    #[test]
    fn direct_edge_yields_empty_path() {
        let mut dag = WordDag::new(b"ab");
        dag.add_edge(0, 1, 1.0);
        dag.add_edge(1, 2, 1.0);
        dag.add_edge(0, 2, 0.5);

        let result = shortest_path(&dag).unwrap();
        assert!(result.path.is_empty());
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn graphviz_dump() {
        let mut dag = WordDag::new(b"ab");
        dag.add_edge(0, 1, 1.0);
        dag.add_edge(1, 2, 2.0);

        let mut out = Vec::new();
        dag.dump_graphviz(&mut out).unwrap();
        let dot = String::from_utf8(out).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("start -> 1"));
        assert!(dot.contains("1 -> end"));
    }
}

mod test_dict {
    use wordseg_rs::{load_dict, save_dict, FreqDict, WordDag};

    fn sample_dict() -> FreqDict {
        let mut dict = FreqDict::new();
        dict.add_word("雪花", 10);
        dict.add_word("最终", 10);
        dict.add_word("果实", 10);
        dict.finalize();
        dict
    }

    #[test]
    fn freq_lookup() {
        let dict = sample_dict();
        assert_eq!(dict.freq("雪花"), Some(10));
        assert_eq!(dict.freq("雪"), None);
        assert_eq!(dict.freq("雪花糕"), None);
        assert_eq!(dict.total(), 30);
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn dict_edges_cover_every_occurrence() {
        let dict = sample_dict();
        let sentence = "而雪花是最终的果实";
        let mut dag = WordDag::new(sentence.as_bytes());
        dict.add_edges(&mut dag);

        assert!(dag.adjacents(3).contains_key(&9));
        assert!(dag.adjacents(12).contains_key(&18));
        assert!(dag.adjacents(21).contains_key(&27));

        // log2(30) - log2(10)
        let weight = dag.adjacents(3)[&9];
        assert!((weight - 3.0f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn save_load_round_trip() {
        let dict = sample_dict();
        let mut buffer = Vec::new();
        save_dict(&dict, &mut buffer).unwrap();

        let reloaded = load_dict(buffer.as_slice()).unwrap();
        assert_eq!(reloaded.total(), dict.total());
        let before: Vec<_> = dict.iter().map(|(w, f)| (w.to_owned(), f)).collect();
        let after: Vec<_> = reloaded.iter().map(|(w, f)| (w.to_owned(), f)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn load_rejects_malformed_lines() {
        assert!(load_dict("雪花".as_bytes()).is_err());
        assert!(load_dict("雪花 ten".as_bytes()).is_err());
    }

    #[test]
    fn suggested_weights() {
        let dict = sample_dict();
        assert!((dict.suggest_rune_weight() - 31.0f64.log2()).abs() < 1e-12);
        // total below the saturation constant: no extra model penalty
        assert_eq!(dict.suggest_hmm_weight(), 0.0);
    }
}

mod test_hmm {
    use wordseg_rs::{load_model, save_model, viterbi, BmesHmm, BmesState, Hmm, NUM_STATES};

    use BmesState::{Begin, End, Middle, Single};

    fn runes(sentence: &str) -> Vec<&[u8]> {
        wordseg_rs::split_runes(sentence.as_bytes()).unwrap()
    }

    fn sample_model() -> BmesHmm {
        let mut model = BmesHmm::new();
        model.train(&runes("你好"), &[Begin, End]);
        model.train(
            &runes("春风吹拂的季节"),
            &[Begin, End, Begin, End, Single, Begin, End],
        );
        model.train(&runes("翩翩起舞"), &[Begin, Middle, Middle, End]);
        model.normalize();
        model
    }

    #[test]
    fn trained_model_is_not_trivial() {
        let model = sample_model();
        assert!(!model.is_trivial());
        assert!(BmesHmm::new().is_trivial());
    }

    #[test]
    fn training_counts() {
        let model = sample_model();
        let counts = &model.hmm.training;
        assert_eq!(counts.pi, [3, 0, 0, 0]);
        assert_eq!(counts.a[Begin.ordinal()][End.ordinal()], 4);
        assert_eq!(counts.a[Middle.ordinal()][Middle.ordinal()], 1);
        assert_eq!(counts.b["你".as_bytes()], [1, 0, 0, 0]);
        assert_eq!(counts.b["的".as_bytes()], [0, 0, 0, 1]);
    }

    #[test]
    fn unseen_observable_emits_uniformly() {
        let model = sample_model();
        for state in 0..NUM_STATES {
            assert_eq!(model.hmm.emission("卡".as_bytes(), state), -2.0);
        }
    }

    #[test]
    fn decode_recovers_training_tags() {
        let model = sample_model();
        assert_eq!(model.decode(&runes("你好")), [Begin, End]);
        assert_eq!(
            model.decode(&runes("翩翩起舞")),
            [Begin, Middle, Middle, End]
        );
    }

    #[test]
    fn viterbi_ties_prefer_low_ordinals() {
        // uniform model: every state sequence scores the same
        let mut model = Hmm::new();
        model.training.pi = [1, 1, 1, 1];
        model.training.a = [[1; NUM_STATES]; NUM_STATES];
        model.normalize();

        let observations = runes("天地人");
        assert_eq!(viterbi(&model, &observations), [0, 0, 0]);
    }

    #[test]
    fn viterbi_is_optimal_exhaustively() {
        let model = sample_model();
        let observations = runes("你好的季节");

        let decoded = viterbi(&model.hmm, &observations);
        let decoded_score = joint_score(&model.hmm, &observations, &decoded);

        let t = observations.len();
        let mut best = f64::NEG_INFINITY;
        for mut code in 0..NUM_STATES.pow(t as u32) {
            let mut states = Vec::with_capacity(t);
            for _ in 0..t {
                states.push(code % NUM_STATES);
                code /= NUM_STATES;
            }
            let score = joint_score(&model.hmm, &observations, &states);
            if score > best {
                best = score;
            }
        }
        assert!((decoded_score - best).abs() < 1e-9);
    }

    fn joint_score(model: &Hmm, observations: &[&[u8]], states: &[usize]) -> f64 {
        let mut score = model.initial(states[0], observations[0]);
        for t in 1..observations.len() {
            score += model.transition(states[t - 1], states[t], observations[t]);
        }
        score
    }

    #[test]
    fn save_load_round_trip() {
        let model = sample_model();
        let mut buffer = Vec::new();
        save_model(&model, &mut buffer).unwrap();

        let reloaded = load_model(buffer.as_slice()).unwrap();
        assert_eq!(reloaded.hmm.training, model.hmm.training);
        assert!(!reloaded.is_trivial());
    }

    #[test]
    fn load_rejects_malformed_model() {
        assert!(load_model("1 2 3".as_bytes()).is_err());
        assert!(load_model("1 2 3 4\n1 1 1 1\n".as_bytes()).is_err());
    }
}

mod test_rune {
    use wordseg_rs::{classify_rune, rune_hop, split_runes, Error, SpecialClass};

    #[test]
    fn hop_lengths() {
        assert_eq!(rune_hop(b'a'), 1);
        assert_eq!(rune_hop(0xc3), 2);
        assert_eq!(rune_hop(0xe4), 3);
        assert_eq!(rune_hop(0xf0), 4);
        // continuation bytes hop one
        assert_eq!(rune_hop(0x80), 1);
    }

    #[test]
    fn split_matches_char_boundaries() {
        let sentence = "a你0好!";
        let runes = split_runes(sentence.as_bytes()).unwrap();
        let lengths: Vec<usize> = runes.iter().map(|rune| rune.len()).collect();
        assert_eq!(lengths, [1, 3, 1, 3, 1]);
    }

    #[test]
    fn truncated_rune_is_bad_encoding() {
        let bad = &"你".as_bytes()[..2];
        match split_runes(bad) {
            Err(Error::BadEncoding { offset }) => assert_eq!(offset, 0),
            other => panic!("expected bad encoding, got {other:?}"),
        }
    }

    #[test]
    fn classes() {
        assert_eq!(classify_rune("你".as_bytes()), SpecialClass::NotSpecial);
        assert_eq!(classify_rune(b" "), SpecialClass::Whitespace);
        assert_eq!(classify_rune(b"\t"), SpecialClass::Whitespace);
        assert_eq!(classify_rune(b"\n"), SpecialClass::Crlf);
        assert_eq!(classify_rune("—".as_bytes()), SpecialClass::CnDash);
        assert_eq!(classify_rune("…".as_bytes()), SpecialClass::CnEllipsis);
        assert_eq!(classify_rune("　".as_bytes()), SpecialClass::IdeographicSpace);
        assert_eq!(classify_rune(b"a"), SpecialClass::Other);
        assert_eq!(classify_rune("，".as_bytes()), SpecialClass::Other);
    }

    #[test]
    fn error_codes() {
        assert_eq!(Error::Internal.code(), -1);
        assert_eq!(Error::Parse("x".into()).code(), -2);
        assert_eq!(Error::BadEncoding { offset: 0 }.code(), -3);
        assert_eq!(Error::Overflow.code(), -4);
    }
}

mod test_word_break {
    use wordseg_rs::{word_break, word_break_bytes, BmesHmm, BmesState, Error, FreqDict, Segmenter};

    use BmesState::{Begin, End, Middle, Single};

    fn runes(sentence: &str) -> Vec<&[u8]> {
        wordseg_rs::split_runes(sentence.as_bytes()).unwrap()
    }

    fn sample_dict() -> FreqDict {
        let mut dict = FreqDict::new();
        for (word, freq) in [
            ("在", 500),
            ("的", 800),
            ("春风", 56),
            ("吹拂", 30),
            ("季节", 40),
            ("起舞", 15),
            ("翩翩起舞", 20),
            ("雪花", 10),
            ("最终", 10),
            ("果实", 10),
        ] {
            dict.add_word(word, freq);
        }
        dict.finalize();
        dict
    }

    fn sample_hmm() -> BmesHmm {
        let mut model = BmesHmm::new();
        model.train(&runes("你好"), &[Begin, End]);
        model.train(
            &runes("春风吹拂的季节"),
            &[Begin, End, Begin, End, Single, Begin, End],
        );
        model.train(&runes("翩翩起舞"), &[Begin, Middle, Middle, End]);
        model.normalize();
        model
    }

    #[test]
    fn bare_lattice_falls_apart_into_runes() {
        let tokens = word_break("你我他", None, None).unwrap();
        assert_eq!(tokens, ["你", "我", "他"]);

        // an empty dictionary and a trivial model change nothing
        let mut dict = FreqDict::new();
        dict.finalize();
        let tokens = word_break("你我他", Some(&dict), Some(&BmesHmm::new())).unwrap();
        assert_eq!(tokens, ["你", "我", "他"]);
    }

    #[test]
    fn empty_sentence_has_no_tokens() {
        assert_eq!(word_break("", None, None).unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn dictionary_words_win_over_runes() {
        let dict = sample_dict();
        let tokens = word_break("而雪花是最终的果实", Some(&dict), None).unwrap();
        assert_eq!(tokens, ["而", "雪花", "是", "最终", "的", "果实"]);
    }

    #[test]
    fn hmm_proposes_out_of_dictionary_words() {
        let hmm = sample_hmm();
        let tokens = word_break("你好", None, Some(&hmm)).unwrap();
        assert_eq!(tokens, ["你好"]);
    }

    #[test]
    fn partition_and_boundaries_with_both_resources() {
        let dict = sample_dict();
        let hmm = sample_hmm();
        let sentence = "在春风吹拂的季节翩翩起舞";

        let tokens = word_break(sentence, Some(&dict), Some(&hmm)).unwrap();
        assert_eq!(tokens.concat(), sentence);

        let mut offset = 0;
        for token in &tokens {
            assert!(sentence.is_char_boundary(offset));
            assert!(!token.is_empty());
            offset += token.len();
        }
        assert_eq!(offset, sentence.len());
    }

    #[test]
    fn special_runs_stay_whole() {
        let dict = sample_dict();
        let tokens = word_break("雪花  \t 果实", Some(&dict), None).unwrap();
        assert_eq!(tokens, ["雪花", "  \t ", "果实"]);
    }

    #[test]
    fn byte_input_surfaces_bad_encoding() {
        let bad = &"雪花".as_bytes()[..4];
        match word_break_bytes(bad, None, None) {
            Err(Error::BadEncoding { offset }) => assert_eq!(offset, 3),
            other => panic!("expected bad encoding, got {other:?}"),
        }
    }

    #[test]
    fn segmenter_batches() {
        let segmenter = Segmenter::new(Some(sample_dict()), Some(sample_hmm()));
        let sentences = ["而雪花是最终的果实", "你好"];

        let batches = segmenter.batch_segment(&sentences).unwrap();
        assert_eq!(batches.len(), 2);
        for (tokens, sentence) in batches.iter().zip(sentences) {
            assert_eq!(tokens.concat(), sentence);
        }
    }
}

mod test_sentence_split {
    use wordseg_rs::split_sentences;

    #[test]
    fn splits_on_terminators() {
        assert_eq!(
            split_sentences("你好。再见！\n回见"),
            ["你好。", "再见！", "\n", "回见"]
        );
    }

    #[test]
    fn crlf_is_one_terminator() {
        assert_eq!(split_sentences("你好\r\n再见"), ["你好\r\n", "再见"]);
    }

    #[test]
    fn no_terminator_yields_whole_text() {
        assert_eq!(split_sentences("回见"), ["回见"]);
        assert_eq!(split_sentences(""), Vec::<&str>::new());
    }
}

mod test_properties {
    use proptest::prelude::*;
    use wordseg_rs::{word_break, word_break_bytes, AcTrie, DoubleArrayTrie, WordArena, WordDag};

    fn both_scans(patterns: &[String], haystack: &[u8]) -> (Vec<(usize, usize)>, Vec<(usize, usize)>) {
        let mut arena = WordArena::new();
        let mut trie = AcTrie::new();
        for pattern in patterns {
            let word = arena.push(pattern.as_bytes());
            trie.add(word, &arena);
        }
        trie.finalize();

        let mut from_trie = Vec::new();
        trie.scan(haystack, None, |end, word| {
            from_trie.push((end - word.len(), word.len()));
        });

        let dat = DoubleArrayTrie::build_from(&trie, &arena);
        let mut from_dat = Vec::new();
        dat.scan(haystack, &arena, |end, word| {
            from_dat.push((end - word.len(), word.len()));
        });

        from_trie.sort_unstable();
        from_dat.sort_unstable();
        (from_trie, from_dat)
    }

    proptest! {
        // a small alphabet forces dense overlaps, merged chains and fail
        // links into those chains
        #[test]
        fn dat_scan_equals_reference_scan(
            patterns in proptest::collection::vec("[abz]{1,8}", 1..12),
            haystack in "[abz]{0,48}",
        ) {
            let (from_trie, from_dat) = both_scans(&patterns, haystack.as_bytes());
            prop_assert_eq!(from_trie, from_dat);
        }

        #[test]
        fn word_break_partitions_any_sentence(
            sentence in "[\\u{4e00}-\\u{9fa5}a-z0-9 。！—]{0,24}",
        ) {
            let tokens = word_break(&sentence, None, None).unwrap();
            let joined = tokens.concat();
            prop_assert_eq!(&joined, &sentence);
        }

        #[test]
        fn cuts_lie_on_rune_boundaries(
            sentence in "[\\u{4e00}-\\u{9fa5}a-z ]{0,24}",
        ) {
            let tokens = word_break_bytes(sentence.as_bytes(), None, None).unwrap();
            let mut offset = 0;
            for token in &tokens {
                prop_assert!(sentence.is_char_boundary(offset));
                prop_assert!(std::str::from_utf8(token).is_ok());
                offset += token.len();
            }
            prop_assert_eq!(offset, sentence.len());
        }

        #[test]
        fn duplicate_edges_keep_the_minimum(
            weights in proptest::collection::vec(0.0f64..100.0, 1..10),
        ) {
            let mut dag = WordDag::new(b"0123");
            for &weight in &weights {
                dag.add_edge(0, 2, weight);
            }
            let minimum = weights.iter().copied().fold(f64::INFINITY, f64::min);
            prop_assert_eq!(dag.adjacents(0)[&2], minimum);
            prop_assert_eq!(dag.in_degree()[2], 1);
        }
    }
}
