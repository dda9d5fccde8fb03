/*!

This is the long-form manual for `admission_ratio` and `ratiocast`.

## Inputs

### Scrape

The scrape is a JSON array with one object per university, as written by the
page fetcher:

```text
[
  {
    "university": "가야대학교",
    "updateTime": "2025.01.02 18:00",
    "details": [
      {
        "heading": "가군 일반학생전형 경쟁률 현황",
        "headers": ["캠퍼스", "모집단위", "모집인원", "지원인원", "경쟁률"],
        "rows": [["김해", "간호학과", "20", "60", "3.00 : 1"]]
      }
    ]
  }
]
```

Universities with an `error` field or without `details` are skipped.

The group of a table comes from the start of its heading (가군, 나군 or 다군).
Tables without a group go to the 기타 bucket, which is kept in the organized
output but never enriched.

Rows are read even when their columns do not line up with the header: a
rowspan may remove the campus cell, and some sites interleave a descriptive
cell between the department and the counts. The campus and the track of a
missing cell are inherited from the previous row of the same table. Total rows
(소계, 총계) are dropped.

### Regional roster

Spreadsheet or CSV. Data starts at row 3 (index 2).

| column | field |
|--------|-------|
| A | region |
| B | university |
| D | group (가, 나, 다) |
| G | department |

### Wait-list roster

Final results of the previous cycle. Data starts at row 4 (index 3).

| column | field |
|--------|-------|
| B | university |
| C | group |
| D | department |
| E | capacity |
| F | final ratio |
| G | wait-list promotions (작년추합) |

### Rate-history roster

Ratios of the three previous cycles at fixed points of the application window.
Data starts at row 3 (index 2). University is in A, group in B, department in E.
Then each cycle takes 7 columns, starting at H (2024), O (2023) and V (2022):
3일전, 2일전, 1일전, 마감오전, 마감오후, then the final ratio.

The rate-history roster is optional. Without it, every growth factor is 1.

All the column positions can be set in the configuration.

## Matching

Names are compared after normalization: whitespace, parenthesized parts, the
국립 prefix, the 서울캠퍼스 suffix and the 대학교/대학/대 suffix are removed.
여자대학교 and 외국어대학교 become 여대 and 외대. Departments also lose their
bracketed parts.

Each stage looks a record up by university + group + department, then by
university + group, then by university alone. When nothing matches:

| stage | default |
|-------|---------|
| region | 미분류 |
| wait-list | 0 |
| growth | aggregate of all the samples (1 without history) |

Several roster rows often share a key. They are reduced as follows:

| stage | exact | group | university |
|-------|-------|-------|------------|
| region | last row | last row (configurable) | most frequent |
| wait-list | last row | rounded mean | rounded mean |
| growth | median | median | median |

A growth sample is `final / day` for one past cycle. It is kept only when both
ratios are positive and the quotient lies between `minRatio` (0.5) and
`maxRatio` (100). The `mean` aggregation with a `maxRatio` of 20 reproduces the
older same-day comparison.

## Outputs

The enriched file has one array per group under "가군", "나군" and "다군".
Each record carries:

| field | content |
|-------|---------|
| 대학명, 캠퍼스, 전형명, 모집단위 | as scraped |
| 모집인원, 지원인원 | integers |
| 경쟁률 | as scraped |
| 지역 | region |
| 작년추합 | wait-list count |
| 증가율 | growth factor, 2 decimals |
| 예상최종경쟁, 예상최종경쟁값 | current ratio times growth, as "x.xx : 1" and as a number |
| 예상실질경쟁, 예상실질경쟁값 | final ratio times capacity over capacity plus wait list |
| _regionMatch, _waitlistMatch, _growthMatch | the tier that matched: exact, group, univ or default |

The real ratio is 0 when capacity plus wait list is 0.

Nothing is written when a required roster is missing: the previous output is
left in place.

*/
